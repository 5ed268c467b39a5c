pub mod product;
pub mod record;
pub mod inventory;

pub use product::{ClothingSize, Product, ProductDetails, ProductError, ProductResult, ProductType};
pub use record::ProductRecord;
pub use inventory::{ErrorKind, Inventory, InventoryError, InventoryResult};
