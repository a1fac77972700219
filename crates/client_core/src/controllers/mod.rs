//! View controllers: each owns its local copy of the heroes it shows and
//! forwards user actions to the [`HeroApi`](crate::service::HeroApi).

pub mod dashboard;
pub mod detail;
pub mod heroes;

pub use dashboard::DashboardController;
pub use detail::HeroDetailController;
pub use heroes::HeroesController;

#[cfg(test)]
#[path = "../tests/controllers_tests.rs"]
mod tests;
