use crate::api::ScoreApi;
use crate::charts::{self, ChartRegistry};
use crate::schemas::{format_number, DashboardStats};
use crate::screen::Screen;

/// Card texts in slot order: students, weekly entries, average, top students.
pub fn stat_card_texts(stats: &DashboardStats) -> [String; 4] {
    [
        format!("{}명", format_number(stats.total_students)),
        format!("{}건", format_number(stats.weekly_scores)),
        format!("{}점", format_number(stats.average_score)),
        format!("{}명", format_number(stats.top_students)),
    ]
}

pub fn bind_stats(stats: &DashboardStats, charts: &mut ChartRegistry, screen: &mut Screen) {
    for (index, text) in stat_card_texts(stats).into_iter().enumerate() {
        screen.set_stat_card(index, text);
    }

    if !stats.class_averages.is_empty() {
        charts::update_class_chart(charts, &stats.class_averages);
    }
}

/// One fetch per dashboard activation. Failures are logged and the cards keep
/// whatever they showed before.
pub async fn load_dashboard_data(
    api: &dyn ScoreApi,
    charts: &mut ChartRegistry,
    screen: &mut Screen,
) -> Option<DashboardStats> {
    match api.dashboard_stats().await {
        Ok(stats) => {
            bind_stats(&stats, charts, screen);
            Some(stats)
        }
        Err(err) => {
            tracing::error!(error = %err, "Failed to load dashboard data");
            None
        }
    }
}
