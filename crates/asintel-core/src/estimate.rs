//! Monthly sales estimation from provider floor values.
//!
//! The provider reports monthly units sold as a floor of a bucket
//! ("1000+ sold last month"). These helpers widen the floor into a
//! (min, max) range and a weighted average for display.

/// Bucket floors to bucket ceilings for the monthly-sold figure.
///
/// A floor not present in the table (above the last bucket) falls back
/// to `floor * 1.3`; a floor of `-1` means no data.
const SALES_TIERS: [(i64, i64); 31] = [
    (0, 50),
    (50, 100),
    (100, 200),
    (200, 300),
    (300, 400),
    (400, 500),
    (500, 600),
    (600, 700),
    (700, 800),
    (800, 900),
    (900, 1000),
    (1000, 2000),
    (2000, 3000),
    (3000, 4000),
    (4000, 5000),
    (5000, 6000),
    (6000, 7000),
    (7000, 8000),
    (8000, 9000),
    (9000, 10000),
    (10000, 20000),
    (20000, 30000),
    (30000, 40000),
    (40000, 50000),
    (50000, 60000),
    (60000, 70000),
    (70000, 80000),
    (80000, 90000),
    (90000, 100000),
    (100000, 150000),
    (150000, 200000),
];

/// Estimated (min, max) monthly unit sales for a reported floor.
pub fn monthly_sales_range(floor: i64) -> (i64, i64) {
    if floor < 0 {
        return (0, 0);
    }
    for (min, max) in SALES_TIERS {
        if floor == min {
            return (min, max);
        }
    }
    (floor, (floor as f64 * 1.3) as i64)
}

/// Weighted average of a sales range, biased toward the floor.
///
/// The floor is the only observed value; the ceiling is a bucket bound,
/// so it gets a 10% weight.
pub fn average_monthly_sales(min: i64, max: i64) -> i64 {
    (min as f64 * 0.9 + max as f64 * 0.1) as i64
}
