//! UI Components

pub mod cpu_chart;
pub mod toast;

pub use cpu_chart::CpuChart;
pub use toast::{ToastFrame, ToastKind, use_toast, use_toast_provider};
