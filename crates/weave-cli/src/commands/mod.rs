mod check;
mod export;
mod identify;

pub use check::handle_check;
pub use export::handle_export;
pub use identify::{compose, handle_identify};

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::Path;

    use crate::manifest::Manifest;

    pub const ORDERS: &str = include_str!("../../manifests/orders.toml");

    pub fn orders() -> Manifest {
        Manifest::parse(ORDERS, Path::new("orders.toml")).unwrap()
    }
}
