mod calculators;
mod chat_flow;
mod config_flow;
