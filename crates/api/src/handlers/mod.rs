pub mod farm;
pub mod forms;
pub mod validation;
