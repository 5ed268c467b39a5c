use chrono::NaiveDate;
use proptest::prelude::*;
use stockroom_catalog::{ClothingSize, ErrorKind, Inventory, Product, ProductError};
use tempfile::TempDir;

fn product_strategy() -> impl Strategy<Value = Product> {
    let price = 0.01f64..10_000.0;
    let quantity = 0u32..100_000;

    prop_oneof![
        ("[A-Za-z ]{1,12}", price.clone(), quantity.clone(), "[A-Za-z]{1,8}", 0u8..10).prop_map(
            |(name, price, qty, brand, warranty)| {
                Product::electronics("X", name, price, qty, brand, f64::from(warranty) / 2.0).unwrap()
            }
        ),
        ("[A-Za-z ]{1,12}", price.clone(), quantity.clone(), 0i64..3650).prop_map(
            |(name, price, qty, offset)| {
                let expiry = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(offset);
                Product::grocery("X", name, price, qty, expiry).unwrap()
            }
        ),
        ("[A-Za-z ]{1,12}", price, quantity, 0usize..4, "[A-Za-z]{1,8}").prop_map(
            |(name, price, qty, size, material)| {
                let size = [ClothingSize::S, ClothingSize::M, ClothingSize::L, ClothingSize::XL][size];
                Product::clothing("X", name, price, qty, size, material).unwrap()
            }
        ),
    ]
}

/// Re-key generated products with unique ids
fn with_id(product: Product, index: usize) -> Product {
    let mut record = product.to_record();
    record.product_id = format!("P{index:04}");
    Product::from_record(record).unwrap()
}

proptest! {
    #[test]
    fn sell_within_stock_decrements(stock in 1u32..10_000, pick in 0.0f64..1.0) {
        let mut product = Product::clothing("C001", "Shirt", 10.0, stock, ClothingSize::M, "Cotton").unwrap();
        let quantity = 1 + ((f64::from(stock - 1)) * pick) as i64;

        prop_assert_eq!(product.sell(quantity).unwrap(), stock - quantity as u32);
        prop_assert_eq!(product.quantity_in_stock(), stock - quantity as u32);
    }

    #[test]
    fn oversell_leaves_stock(stock in 0u32..10_000, excess in 1i64..10_000) {
        let mut product = Product::clothing("C001", "Shirt", 10.0, stock, ClothingSize::M, "Cotton").unwrap();
        let quantity = i64::from(stock) + excess;

        let is_insufficient = matches!(
            product.sell(quantity),
            Err(ProductError::InsufficientStock { available, .. }) if available == stock
        );
        prop_assert!(is_insufficient);
        prop_assert_eq!(product.quantity_in_stock(), stock);
    }

    #[test]
    fn non_positive_quantities_leave_state(stock in 0u32..10_000, quantity in i64::MIN..=0) {
        let mut inventory = Inventory::new();
        inventory
            .add(Product::clothing("C001", "Shirt", 10.0, stock, ClothingSize::M, "Cotton").unwrap())
            .unwrap();

        prop_assert_eq!(inventory.sell("C001", quantity).unwrap_err().kind(), ErrorKind::InvalidArgument);
        prop_assert_eq!(inventory.restock("C001", quantity).unwrap_err().kind(), ErrorKind::InvalidArgument);
        prop_assert_eq!(inventory.get("C001").unwrap().quantity_in_stock(), stock);
    }

    #[test]
    fn restock_then_sell_round_trips(stock in 0u32..100_000, amount in 1i64..100_000) {
        let mut product = Product::electronics("E001", "Radio", 25.0, stock, "Acme", 2.0).unwrap();

        product.restock(amount).unwrap();
        product.sell(amount).unwrap();

        prop_assert_eq!(product.quantity_in_stock(), stock);
    }

    #[test]
    fn total_value_is_sum_of_products(products in prop::collection::vec(product_strategy(), 0..20)) {
        let mut inventory = Inventory::new();
        let mut expected = 0.0;
        for (index, product) in products.into_iter().enumerate() {
            let product = with_id(product, index);
            expected += product.price() * f64::from(product.quantity_in_stock());
            inventory.add(product).unwrap();
        }

        prop_assert!((inventory.total_value() - expected).abs() <= expected.abs() * 1e-9);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn save_then_load_is_identity(products in prop::collection::vec(product_strategy(), 0..12)) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("inventory.json");

        let mut original = Inventory::new();
        for (index, product) in products.into_iter().enumerate() {
            original.add(with_id(product, index)).unwrap();
        }
        original.save(&path).unwrap();

        let mut restored = Inventory::new();
        restored.load(&path).unwrap();

        prop_assert_eq!(restored.to_records(), original.to_records());
    }
}
