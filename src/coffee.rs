use serde::{Deserialize, Serialize};

use crate::flyweight::{Construct, Flyweight};

/// A day of orders at the coffee shop: 15 orders, 3 distinct flavors.
pub const SAMPLE_ORDERS: [(&str, u32); 15] = [
    ("Cappuccino", 2),
    ("Cappuccino", 2),
    ("Frappe", 1),
    ("Frappe", 1),
    ("Xpresso", 1),
    ("Frappe", 897),
    ("Cappuccino", 97),
    ("Cappuccino", 97),
    ("Frappe", 3),
    ("Xpresso", 3),
    ("Cappuccino", 3),
    ("Xpresso", 96),
    ("Frappe", 552),
    ("Cappuccino", 121),
    ("Xpresso", 121),
];

/// A coffee flavor: the shared intrinsic state of many orders.
#[derive(Debug, PartialEq, Eq)]
pub struct CoffeeFlavor {
    flavor: String,
}

impl CoffeeFlavor {
    pub fn flavor(&self) -> &str {
        &self.flavor
    }

    pub fn serve_coffee(&self, context: &OrderContext) -> String {
        format!(
            "Serving Coffee flavor {} to table number {}",
            self.flavor,
            context.table()
        )
    }
}

impl Flyweight for CoffeeFlavor {
    type Context = OrderContext;

    fn from_key(key: &str, _token: Construct) -> Self {
        CoffeeFlavor {
            flavor: key.to_string(),
        }
    }

    fn key(&self) -> &str {
        &self.flavor
    }

    fn describe(&self, context: &OrderContext) -> String {
        self.serve_coffee(context)
    }
}

/// Where an order goes. Owned by the caller, never stored in a flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderContext {
    table: u32,
}

impl OrderContext {
    pub fn new(table: u32) -> Self {
        OrderContext { table }
    }

    pub fn table(&self) -> u32 {
        self.table
    }
}
