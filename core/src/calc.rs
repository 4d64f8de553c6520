//! Concrete and paint estimates.

/// Capacity of one paint pail ("cubeta"), in liters.
pub const CONTAINER_LITERS: f64 = 19.0;

/// Parse a numeric form field.
///
/// Blank, unparseable and non-finite input coerces to `0.0` so that a
/// half-typed field never turns into an error.
#[must_use]
pub fn parse_field(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConcreteInputs {
    pub length_m: f64,
    pub width_m: f64,
    pub thickness_cm: f64,
    pub waste_percent: f64,
}

impl ConcreteInputs {
    #[must_use]
    pub fn from_fields(length: &str, width: &str, thickness: &str, waste: &str) -> Self {
        Self {
            length_m: parse_field(length),
            width_m: parse_field(width),
            thickness_cm: parse_field(thickness),
            waste_percent: parse_field(waste),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConcreteEstimate {
    /// Slab volume before waste.
    pub volume_m3: f64,
    /// Volume to order, waste included.
    pub total_m3: f64,
}

#[must_use]
pub fn concrete(inputs: ConcreteInputs) -> ConcreteEstimate {
    let volume_m3 = inputs.length_m * inputs.width_m * (inputs.thickness_cm / 100.0);
    let total_m3 = volume_m3 * (1.0 + inputs.waste_percent / 100.0);
    ConcreteEstimate {
        volume_m3,
        total_m3,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PaintInputs {
    pub area_m2: f64,
    pub coats: f64,
    /// Square meters covered by one liter.
    pub coverage_m2_per_liter: f64,
}

impl PaintInputs {
    /// A coverage rate of zero (blank field included) falls back to `1` so the
    /// division stays finite.
    #[must_use]
    pub fn from_fields(area: &str, coats: &str, coverage: &str) -> Self {
        let coverage = parse_field(coverage);
        Self {
            area_m2: parse_field(area),
            coats: parse_field(coats),
            coverage_m2_per_liter: if coverage == 0.0 { 1.0 } else { coverage },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintEstimate {
    pub liters: f64,
    /// Number of 19 L pails; fractional on purpose.
    pub containers: f64,
}

#[must_use]
pub fn paint(inputs: PaintInputs) -> PaintEstimate {
    let liters = (inputs.area_m2 * inputs.coats) / inputs.coverage_m2_per_liter;
    PaintEstimate {
        liters,
        containers: liters / CONTAINER_LITERS,
    }
}

/// Two decimals; non-positive and non-finite values render as `0.00`.
#[must_use]
pub fn format_m3(value: f64) -> String {
    if value.is_finite() && value > 0.0 {
        format!("{value:.2}")
    } else {
        "0.00".to_string()
    }
}

/// One decimal; non-positive and non-finite values render as `0.0`.
#[must_use]
pub fn format_liters(value: f64) -> String {
    if value.is_finite() && value > 0.0 {
        format!("{value:.1}")
    } else {
        "0.0".to_string()
    }
}
