//! URL helpers for the admin API
//!
//! The base URL always comes from configuration; paths are schema paths
//! such as `/subcategories`.

/// Build a full API URL from a base and a path
///
/// # Example
/// ```rust,ignore
/// let url = api_url("http://localhost:5000/api/", "/pages/admin");
/// assert_eq!(url, "http://localhost:5000/api/pages/admin");
/// ```
pub fn api_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// URL записи: `{base}{path}/{id}`, ID кодируется
pub fn item_url(base: &str, path: &str, id: &str) -> String {
    format!("{}/{}", api_url(base, path), urlencoding::encode(id))
}

/// Append query parameters; empty list leaves the URL untouched
pub fn with_query(url: &str, pairs: &[(&str, String)]) -> String {
    let query = query_string(pairs);
    if query.is_empty() {
        url.to_string()
    } else {
        format!("{}?{}", url, query)
    }
}

pub fn query_string(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Полный адрес изображения по относительному пути из записи
///
/// Абсолютные адреса (например, CDN Shopify) возвращаются как есть.
pub fn image_url(image_base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    api_url(image_base, &path.replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_joins_single_slash() {
        assert_eq!(
            api_url("http://localhost:5000/api/", "/subcategories"),
            "http://localhost:5000/api/subcategories"
        );
        assert_eq!(
            api_url("http://localhost:5000/api", "pages/admin"),
            "http://localhost:5000/api/pages/admin"
        );
    }

    #[test]
    fn test_item_url_encodes_id() {
        assert_eq!(
            item_url("http://h/api", "/pages", "a b/c"),
            "http://h/api/pages/a%20b%2Fc"
        );
    }

    #[test]
    fn test_query_encoding() {
        let pairs = vec![("search", "dog food & treats".to_string())];
        assert_eq!(
            with_query("http://h/api/products", &pairs),
            "http://h/api/products?search=dog%20food%20%26%20treats"
        );
        assert_eq!(with_query("http://h/api/products", &[]), "http://h/api/products");
    }

    #[test]
    fn test_image_url() {
        assert_eq!(
            image_url("http://localhost:5000/", "uploads\\banner.png"),
            "http://localhost:5000/uploads/banner.png"
        );
        assert_eq!(
            image_url("http://localhost:5000", "https://cdn.shopify.com/x.png"),
            "https://cdn.shopify.com/x.png"
        );
    }
}
