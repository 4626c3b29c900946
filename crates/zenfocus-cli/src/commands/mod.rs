pub mod config;
pub mod modes;
pub mod run;
pub mod theme;
