//! Page classification by URL.
//!
//! Plain case-insensitive substring checks on the whole URL, so a pattern
//! may match in the host, the path or the query.

/// URL fragments that suggest a shopping site.
pub const ECOMMERCE_PATTERNS: &[&str] = &[
    "checkout", "cart", "basket", "shop", "store", "product", "item", "buy", "purchase", "amazon", "ebay", "walmart",
    "target", "bestbuy", "costco", "shopify",
];

fn contains_any(url: &str, patterns: &[&str]) -> bool {
    let url = url.to_lowercase();
    patterns.iter().any(|p| url.contains(p))
}

/// Whether navigation to `url` should trigger page analysis.
pub fn is_ecommerce_url(url: &str) -> bool {
    contains_any(url, ECOMMERCE_PATTERNS)
}

pub fn is_checkout_page(url: &str) -> bool {
    contains_any(url, &["checkout", "payment"])
}

pub fn is_cart_page(url: &str) -> bool {
    contains_any(url, &["cart", "basket"])
}

/// Pages where found coupons are worth surfacing to the user.
pub fn offers_coupon_entry(url: &str) -> bool {
    is_checkout_page(url) || is_cart_page(url)
}
