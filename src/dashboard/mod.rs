pub mod chart;
pub mod render;
pub mod report;

use tracing::{info, warn};

use crate::config::DashboardConfig;
use crate::error::DashboardError;

/// Build and render the whole page. Data problems become a message on the
/// page, so this never fails.
pub fn render_dashboard(config: &DashboardConfig) -> String {
    match report::build_report(&config.data_path, config) {
        Ok(r) => {
            info!(
                "Report: {} programs, {} unpriced",
                r.summary.total_programs, r.summary.unpriced
            );
            render::render_report(&r)
        }
        Err(e @ (DashboardError::NoData { .. } | DashboardError::Empty)) => {
            info!("No data to show: {}", e);
            render::render_error(&e)
        }
        Err(e) => {
            warn!("Data file unusable: {}", e);
            render::render_error(&e)
        }
    }
}
