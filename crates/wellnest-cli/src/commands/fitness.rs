use clap::Subcommand;
use serde_json::json;
use wellnest_core::storage::Database;
use wellnest_core::trackers::{FitnessGoals, FitnessPlanner, FocusArea};
use wellnest_core::Config;

use super::{live, print_json, tick_period};

#[derive(Subcommand)]
pub enum FitnessAction {
    /// Save a fitness plan
    Set {
        #[arg(long)]
        goal: String,
        #[arg(long)]
        experience: String,
        /// Sessions per week
        #[arg(long)]
        frequency: String,
        /// Minutes per session, e.g. 20-30
        #[arg(long)]
        duration: String,
        /// Focus area; repeatable (full-body, upper-body, lower-body, core, cardio)
        #[arg(long = "focus", required = true)]
        focus: Vec<FocusArea>,
    },
    /// Show the saved plan and its workouts
    Show,
    /// Run the timed exercises of a focus area in real time
    Workout {
        area: FocusArea,
        #[arg(long)]
        tick_ms: Option<u64>,
    },
}

pub fn run(action: FitnessAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let planner = FitnessPlanner::new(&db);

    match action {
        FitnessAction::Set {
            goal,
            experience,
            frequency,
            duration,
            focus,
        } => {
            let goals = FitnessGoals {
                goal,
                experience,
                frequency,
                duration,
                focus,
            };
            planner.save(&goals)?;
            print_json(&goals)?;
        }
        FitnessAction::Show => {
            let Some(goals) = planner.load()? else {
                return Err("no fitness plan saved; run `fitness set` first".into());
            };
            let workouts: Vec<_> = planner
                .workouts()?
                .into_iter()
                .map(|w| {
                    let exercises: Vec<_> = w
                        .exercises
                        .iter()
                        .map(|e| json!({ "name": e.name, "summary": e.summary() }))
                        .collect();
                    json!({
                        "area": w.area,
                        "icon": w.area.icon(),
                        "calories": w.calories,
                        "steps": w.steps,
                        "exercises": exercises,
                    })
                })
                .collect();
            print_json(&json!({ "plan": goals, "workouts": workouts }))?;
        }
        FitnessAction::Workout { area, tick_ms } => {
            let config = Config::load()?;
            let sequence = planner.timed_sequence(area)?;
            let finished = live::play(&db, sequence, tick_period(&config, tick_ms), None)?;
            print_json(&finished.snapshot())?;
        }
    }
    Ok(())
}
