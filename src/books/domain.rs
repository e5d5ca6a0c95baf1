use crate::core::domain::Identifiable;

pub mod model;

pub(crate) trait Book: Identifiable {
    fn name(&self) -> &str;
    fn in_stock(&self) -> bool;
}
