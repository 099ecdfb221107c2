use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

/// Write a synthetic restaurant CSV in the Zomato export layout.
#[derive(Parser, Debug)]
#[command(name = "generate_sample", version, about)]
struct Args {
    #[arg(
        value_name = "OUTPUT",
        default_value = "sample_zomato.csv",
        help = "Path of the CSV to write"
    )]
    output: PathBuf,
}

/// One output row, using the column labels of the public Zomato export.
#[derive(Serialize)]
struct SampleRow {
    name: String,
    online_order: &'static str,
    book_table: &'static str,
    rate: String,
    votes: u64,
    #[serde(rename = "approx_cost(for two people)")]
    approx_cost: u32,
    #[serde(rename = "listed_in(type)")]
    listed_in_type: &'static str,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

const PREFIXES: [&str; 10] = [
    "Spice", "Royal", "Green", "Urban", "Golden", "Coastal", "Little", "Empire", "Blue", "Old",
];
const SUFFIXES: [&str; 8] = [
    "Kitchen", "Bistro", "Cafe", "Darbar", "Grill", "Bhavan", "Diner", "Restaurant",
];
/// Restaurant type with its relative frequency.
const TYPES: [(&str, f64); 4] = [("Dining", 0.7), ("Delivery", 0.85), ("Cafes", 0.95), ("Buffet", 1.0)];
const COSTS: [u32; 9] = [100, 200, 300, 400, 500, 600, 800, 1200, 1500];

fn main() -> Result<()> {
    let output_path = Args::parse().output;

    let mut rng = SimpleRng::new(42);
    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;

    let n_rows = 150;
    for _ in 0..n_rows {
        let roll = rng.next_f64();
        let listed_in_type = TYPES
            .iter()
            .find(|(_, cumulative)| roll < *cumulative)
            .map_or("Dining", |(kind, _)| *kind);

        let online = rng.chance(0.4);
        let rating = 2.5 + rng.next_f64() * 2.4 + if online { 0.2 } else { 0.0 };
        let rating = (rating.min(4.9) * 10.0).round() / 10.0;
        // A few unrated newcomers, as in the real export.
        let rate = if rng.chance(0.03) {
            "NEW".to_string()
        } else {
            format!("{rating:.1}/5")
        };

        let row = SampleRow {
            name: format!("{} {}", rng.pick(&PREFIXES), rng.pick(&SUFFIXES)),
            online_order: if online { "Yes" } else { "No" },
            book_table: if rng.chance(0.15) { "Yes" } else { "No" },
            rate,
            votes: (rng.next_f64().powi(3) * 5000.0) as u64,
            approx_cost: *rng.pick(&COSTS),
            listed_in_type,
        };
        writer.serialize(&row).context("writing sample row")?;
    }
    writer.flush().context("flushing sample CSV")?;

    println!("Wrote {n_rows} restaurants to {}", output_path.display());
    Ok(())
}
