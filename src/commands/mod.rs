pub mod assess;
pub mod compare;
pub mod hierarchy;
pub mod scan;
