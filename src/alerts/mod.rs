pub mod dispatcher;
pub mod mailer;
pub mod renderer;

pub use dispatcher::{plan_alerts, AlertDispatcher, AlertOutcome, AlertPlan};
pub use mailer::Mailer;
pub use renderer::{escape_html, quality_badge, AlertRenderer};
