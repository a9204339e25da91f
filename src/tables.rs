use std::fmt;

/// The five entities of the store, each backed by one CSV file and one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Customers,
    Products,
    Orders,
    OrderItems,
    Payments,
}

impl Table {
    /// Parents before children, so the store stays logically consistent while loading.
    pub const LOAD_ORDER: [Table; 5] = [
        Table::Customers,
        Table::Products,
        Table::Orders,
        Table::OrderItems,
        Table::Payments,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::Customers => "customers",
            Table::Products => "products",
            Table::Orders => "orders",
            Table::OrderItems => "order_items",
            Table::Payments => "payments",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.csv", self.name())
    }

    /// Header a source file must carry, in order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Table::Customers => &["customer_id", "name", "email", "country"],
            Table::Products => &["product_id", "name", "category", "price"],
            Table::Orders => &["order_id", "customer_id", "order_date", "total_amount"],
            Table::OrderItems => &["order_item_id", "order_id", "product_id", "quantity"],
            Table::Payments => &["payment_id", "order_id", "payment_method", "payment_status"],
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_order_puts_parents_first() {
        let position = |t: Table| Table::LOAD_ORDER.iter().position(|x| *x == t).unwrap();

        assert!(position(Table::Customers) < position(Table::Orders));
        assert!(position(Table::Orders) < position(Table::OrderItems));
        assert!(position(Table::Products) < position(Table::OrderItems));
        assert!(position(Table::Orders) < position(Table::Payments));
    }

    #[test]
    fn every_table_is_keyed_by_its_first_column() {
        for table in Table::LOAD_ORDER {
            let key = table.columns()[0];
            assert!(key.ends_with("_id"), "{table} is keyed by {key}");
            assert_eq!(table.columns().len(), 4);
        }
        assert_eq!(Table::OrderItems.file_name(), "order_items.csv");
    }
}
