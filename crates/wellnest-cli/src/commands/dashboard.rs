use wellnest_core::storage::Database;
use wellnest_core::trackers::Dashboard;
use wellnest_core::Config;

use super::{print_json, today};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load()?;
    let summary = Dashboard::new(&db).summary(today(), config.water.daily_goal_ml)?;
    print_json(&summary)
}
