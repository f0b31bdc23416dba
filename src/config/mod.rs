pub mod commands;
pub mod yml_settings;
