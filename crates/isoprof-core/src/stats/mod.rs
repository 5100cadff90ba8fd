pub mod angles;
pub mod robust;

pub use angles::{angle_diff, angle_mean, angle_median, inv_to_eps, inv_to_pa, to_eps, to_pa};
pub use robust::{average, mean, median, quantile, scatter, std_dev, AverageMethod};
