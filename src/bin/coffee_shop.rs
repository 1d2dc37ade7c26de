// Coffee shop: replays a day of orders through a flyweight pool.
//
// Usage: coffee_shop [pool-config.toml]

use colored::Colorize;
use itertools::Itertools;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use flyweight_pool::coffee::SAMPLE_ORDERS;
use flyweight_pool::logging::init_tracing;
use flyweight_pool::{CoffeeFlavor, FlyweightPool, OrderContext, PoolConfig, Result};

// =============================================================================
// Order taking
// =============================================================================

struct CoffeeShop {
    flavors: FlyweightPool<CoffeeFlavor>,
    orders: Vec<(Arc<CoffeeFlavor>, OrderContext)>,
}

impl CoffeeShop {
    fn new(config: PoolConfig) -> Self {
        CoffeeShop {
            flavors: FlyweightPool::with_config(config),
            orders: Vec::new(),
        }
    }

    fn take_order(&mut self, flavor: &str, table: u32) -> Result<()> {
        let flavor = self.flavors.try_get(flavor)?;
        self.orders.push((flavor, OrderContext::new(table)));
        Ok(())
    }

    fn serve_all(&self) -> Vec<String> {
        self.orders
            .iter()
            .map(|(flavor, table)| flavor.serve_coffee(table))
            .collect()
    }
}

fn load_config(path: Option<&Path>) -> Result<PoolConfig> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading pool config");
            PoolConfig::from_file(path)
        }
        None => Ok(PoolConfig::default()),
    }
}

fn main() -> Result<()> {
    init_tracing("flyweight_pool=info")?;

    let config_path = std::env::args().nth(1);
    let config = load_config(config_path.as_deref().map(Path::new))?;
    let mut shop = CoffeeShop::new(config);

    for (flavor, table) in SAMPLE_ORDERS {
        if let Err(err) = shop.take_order(flavor, table) {
            println!("{} {}", "✗".red(), err);
        }
    }

    println!("{}", "=== Serving orders ===".bold());
    for line in shop.serve_all() {
        println!("  {}", line);
    }

    let menu = shop.flavors.keys().sorted().join(", ");
    println!("\n{} {}", "Flavors made:".bold(), menu.cyan());

    let stats = shop.flavors.stats();
    println!("{} {}", "✓".green(), stats);
    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}
