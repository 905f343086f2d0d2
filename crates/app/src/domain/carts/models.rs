//! Cart Models

use crate::domain::{
    carts::errors::CartsServiceError,
    catalog::models::{Product, ProductUuid},
};

/// Sellable attributes of a product captured when its line was added or last merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSnapshot {
    pub name: String,
    pub sku: String,
    /// Unit price in minor currency units.
    pub price: u64,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            sku: product.sku.clone(),
            price: product.price,
        }
    }
}

/// One product's quantity entry within a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub product: ProductSnapshot,
}

impl CartLine {
    /// Snapshot unit price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.product.price.saturating_mul(u64::from(self.quantity))
    }
}

/// Cart Model
///
/// Lines are unique by product and kept in insertion order. The cached totals
/// are recomputed on every mutation, so they always match the lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
    subtotal: u64,
    discount: u64,
    total: u64,
    item_count: u64,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from stored lines, folding duplicate products together.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();

        for line in lines {
            match cart.line_mut(line.product_uuid) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                    existing.product = line.product;
                }
                None => cart.lines.push(line),
            }
        }

        cart.recalculate();

        cart
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, product: ProductUuid) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_uuid == product)
    }

    /// Quantity currently held for `product`, zero when absent.
    #[must_use]
    pub fn quantity_of(&self, product: ProductUuid) -> u32 {
        self.line(product).map_or(0, |line| line.quantity)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of line totals before discount.
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.subtotal
    }

    #[must_use]
    pub fn discount(&self) -> u64 {
        self.discount
    }

    /// Amount payable: subtotal minus discount.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.item_count
    }

    /// Add `quantity` units of `product`, merging into an existing line.
    ///
    /// A merge refreshes the line's snapshot from `product`.
    pub(crate) fn merge(&mut self, product: &Product, quantity: u32) -> Result<(), CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        match self.line_mut(product.uuid) {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or(CartsServiceError::InvalidQuantity)?;
                line.product = ProductSnapshot::from(product);
            }
            None => self.lines.push(CartLine {
                product_uuid: product.uuid,
                quantity,
                product: ProductSnapshot::from(product),
            }),
        }

        self.recalculate();

        Ok(())
    }

    /// Replace the quantity of an existing line.
    pub(crate) fn set_quantity(
        &mut self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<(), CartsServiceError> {
        if quantity == 0 {
            return Err(CartsServiceError::InvalidQuantity);
        }

        let line = self
            .line_mut(product)
            .ok_or(CartsServiceError::ItemNotInCart)?;

        line.quantity = quantity;

        self.recalculate();

        Ok(())
    }

    pub(crate) fn remove(&mut self, product: ProductUuid) -> Result<CartLine, CartsServiceError> {
        let index = self
            .lines
            .iter()
            .position(|line| line.product_uuid == product)
            .ok_or(CartsServiceError::ItemNotInCart)?;

        let removed = self.lines.remove(index);

        self.recalculate();

        Ok(removed)
    }

    fn line_mut(&mut self, product: ProductUuid) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_uuid == product)
    }

    fn recalculate(&mut self) {
        self.subtotal = self
            .lines
            .iter()
            .map(CartLine::line_total)
            .fold(0, u64::saturating_add);

        self.item_count = self
            .lines
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum();

        // Promotions are out of scope; the field stays so totals keep their shape.
        self.discount = 0;
        self.total = self.subtotal.saturating_sub(self.discount);
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use testresult::TestResult;

    use crate::test::fixtures::product;

    use super::*;

    #[test]
    fn empty_cart_has_zero_totals() {
        let cart = Cart::new();

        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), 0);
        assert_eq!(cart.discount(), 0);
        assert_eq!(cart.total(), 0);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn merging_same_product_twice_yields_one_line() -> TestResult {
        let respirator = product("Respirator", 12_500, 100);
        let mut cart = Cart::new();

        cart.merge(&respirator, 2)?;
        cart.merge(&respirator, 3)?;

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.quantity_of(respirator.uuid), 5);
        assert_eq!(cart.total(), 62_500);
        assert_eq!(cart.item_count(), 5);

        Ok(())
    }

    #[test]
    fn merge_refreshes_the_snapshot() -> TestResult {
        let mut gloves = product("Gloves", 5_000, 200);
        let mut cart = Cart::new();

        cart.merge(&gloves, 1)?;

        gloves.price = 4_500;

        cart.merge(&gloves, 1)?;

        assert_eq!(cart.line(gloves.uuid).map(|l| l.product.price), Some(4_500));
        assert_eq!(cart.total(), 9_000);

        Ok(())
    }

    #[test]
    fn lines_keep_insertion_order() -> TestResult {
        let helmet = product("Helmet", 8_000, 10);
        let goggles = product("Goggles", 3_500, 10);
        let mut cart = Cart::new();

        cart.merge(&helmet, 1)?;
        cart.merge(&goggles, 1)?;
        cart.merge(&helmet, 1)?;

        let order: Vec<_> = cart.lines().iter().map(|l| l.product_uuid).collect();

        assert_eq!(order, vec![helmet.uuid, goggles.uuid]);

        Ok(())
    }

    #[test]
    fn set_quantity_replaces_rather_than_adds() -> TestResult {
        let suit = product("Suit", 15_000, 50);
        let mut cart = Cart::new();

        cart.merge(&suit, 4)?;
        cart.set_quantity(suit.uuid, 2)?;

        assert_eq!(cart.quantity_of(suit.uuid), 2);
        assert_eq!(cart.total(), 30_000);

        Ok(())
    }

    #[test]
    fn set_quantity_on_missing_line_leaves_cart_unchanged() -> TestResult {
        let suit = product("Suit", 15_000, 50);
        let mut cart = Cart::new();

        cart.merge(&suit, 1)?;

        let before = cart.clone();
        let result = cart.set_quantity(ProductUuid::new(), 3);

        assert!(
            matches!(result, Err(CartsServiceError::ItemNotInCart)),
            "expected ItemNotInCart, got {result:?}"
        );
        assert_eq!(cart, before);

        Ok(())
    }

    #[test]
    fn zero_quantity_is_rejected() -> TestResult {
        let suit = product("Suit", 15_000, 50);
        let mut cart = Cart::new();

        assert!(matches!(
            cart.merge(&suit, 0),
            Err(CartsServiceError::InvalidQuantity)
        ));

        cart.merge(&suit, 1)?;

        assert!(matches!(
            cart.set_quantity(suit.uuid, 0),
            Err(CartsServiceError::InvalidQuantity)
        ));

        Ok(())
    }

    #[test]
    fn from_lines_folds_duplicate_products() {
        let suit = product("Suit", 15_000, 50);
        let line = CartLine {
            product_uuid: suit.uuid,
            quantity: 1,
            product: ProductSnapshot::from(&suit),
        };

        let cart = Cart::from_lines([line.clone(), line]);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 2);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(usize, u32),
        Update(usize, u32),
        Remove(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..4usize, 1..20u32).prop_map(|(p, q)| Op::Add(p, q)),
            (0..4usize, 1..20u32).prop_map(|(p, q)| Op::Update(p, q)),
            (0..4usize).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn cached_totals_always_match_lines(ops in prop::collection::vec(op(), 0..40)) {
            let products = [
                product("Respirator", 12_500, 1_000),
                product("Gloves", 5_000, 1_000),
                product("Helmet", 8_000, 1_000),
                product("Goggles", 3_500, 1_000),
            ];

            let mut cart = Cart::new();

            for op in ops {
                // Rejected operations must leave the totals consistent too.
                let _outcome = match op {
                    Op::Add(p, q) => cart.merge(&products[p], q),
                    Op::Update(p, q) => cart.set_quantity(products[p].uuid, q),
                    Op::Remove(p) => cart.remove(products[p].uuid).map(|_line| ()),
                };

                let expected_total: u64 = cart.lines().iter().map(|l| l.product.price * u64::from(l.quantity)).sum();
                let expected_count: u64 = cart.lines().iter().map(|l| u64::from(l.quantity)).sum();

                prop_assert_eq!(cart.total(), expected_total);
                prop_assert_eq!(cart.subtotal(), expected_total);
                prop_assert_eq!(cart.item_count(), expected_count);

                let mut seen: Vec<_> = cart.lines().iter().map(|l| l.product_uuid).collect();
                seen.sort();
                seen.dedup();
                prop_assert_eq!(seen.len(), cart.lines().len());
            }
        }
    }
}
