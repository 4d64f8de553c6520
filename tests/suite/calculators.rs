//! Calculator formulas and the calculator panel.

use tlapal_core::{
    ConcreteInputs, PaintInputs, concrete, format_liters, format_m3, paint, parse_field,
};
use tlapal_engine::{App, CalculatorMode, Coats, Credential, GeminiClient, GeminiOptions, Tab};
use tlapal_types::ui::UiOptions;

use crate::common::{render, type_text};

fn offline_app() -> App {
    let client = GeminiClient::new(GeminiOptions {
        base_url: "http://127.0.0.1:9/v1beta".to_string(),
        ..GeminiOptions::default()
    })
    .unwrap();
    App::with_client(client, Credential::empty(), UiOptions::default())
}

#[test]
fn slab_with_five_percent_waste() {
    let estimate = concrete(ConcreteInputs::from_fields("4", "3", "10", "5"));
    assert_eq!(format_m3(estimate.volume_m3), "1.20");
    assert_eq!(format_m3(estimate.total_m3), "1.26");
}

#[test]
fn two_coats_over_forty_square_meters() {
    let estimate = paint(PaintInputs::from_fields("40", "2", "10"));
    assert_eq!(format_liters(estimate.liters), "8.0");
    assert_eq!(format_liters(estimate.containers), "0.4");
}

#[test]
fn blank_and_garbage_fields_count_as_zero() {
    assert!(parse_field("").abs() < f64::EPSILON);
    assert!(parse_field("abc").abs() < f64::EPSILON);
    assert!((parse_field(" 2.5 ") - 2.5).abs() < f64::EPSILON);

    let estimate = concrete(ConcreteInputs::from_fields("", "3", "10", "5"));
    assert_eq!(format_m3(estimate.total_m3), "0.00");
}

#[test]
fn zero_coverage_falls_back_to_one_square_meter_per_liter() {
    let estimate = paint(PaintInputs::from_fields("10", "1", "0"));
    assert_eq!(format_liters(estimate.liters), "10.0");
}

#[test]
fn negative_results_render_as_zero() {
    let estimate = concrete(ConcreteInputs::from_fields("-4", "3", "10", "5"));
    assert_eq!(format_m3(estimate.total_m3), "0.00");
}

#[test]
fn panel_updates_as_fields_change() {
    let mut app = offline_app();
    app.set_tab(Tab::Calculators);
    app.calculators_mut().set_mode(CalculatorMode::Paint);
    app.enter_insert_mode();
    type_text(&mut app, "40");

    let screen = render(&app, 100, 30);
    assert!(screen.contains("PINTURA"));
    assert!(screen.contains("8.0"));

    app.calculators_mut().focus_next();
    app.calculators_mut().toggle_coats();
    assert_eq!(app.calculators().paint().coats, Coats::One);

    let screen = render(&app, 100, 30);
    assert!(screen.contains("1 Mano"));
    assert!(screen.contains("4.0"));
}

#[test]
fn forms_keep_values_across_mode_switches() {
    let mut app = offline_app();
    app.set_tab(Tab::Calculators);
    app.enter_insert_mode();
    type_text(&mut app, "4");

    app.calculators_mut().set_mode(CalculatorMode::Paint);
    app.calculators_mut().set_mode(CalculatorMode::Concrete);
    assert_eq!(app.calculators().concrete().length.text(), "4");

    app.set_tab(Tab::Chat);
    app.set_tab(Tab::Calculators);
    assert_eq!(app.calculators().concrete().length.text(), "4");
}
