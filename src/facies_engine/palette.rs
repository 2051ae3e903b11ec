//! Display colours for facies ids.

/// Fixed palette; facies `id` is drawn with `FACIES_COLORS[id % len]`.
pub const FACIES_COLORS: [&str; 16] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf", "#f4d03f", "#5d6d7e", "#a04000", "#117864", "#6c3483", "#000000",
];

pub fn facies_color(id: usize) -> &'static str {
    FACIES_COLORS[id % FACIES_COLORS.len()]
}
