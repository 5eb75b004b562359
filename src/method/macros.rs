use xxhash_rust::const_xxh3::xxh3_64 as const_xxh3_64;

pub const fn selector_hash(name: &str) -> u64 {
    const_xxh3_64(name.as_bytes())
}

/// Compile-time call selector generator using xxHash3.
///
/// Computes a deterministic `u64` selector from the operation name at
/// **compile time**. The same name yields the same selector on every
/// platform, so both sides of the wire can derive it independently.
///
/// ## Example
///
/// ```rust
/// use muxcall::call_selector;
/// let balance_of = call_selector!("balanceOf");
/// let decimals = call_selector!("decimals");
/// assert_ne!(balance_of, decimals);
/// ```
#[macro_export]
macro_rules! call_selector {
    ($name:literal) => {{
        const SELECTOR: u64 = $crate::selector_hash($name);
        SELECTOR
    }};
}
