//! Prefix-scoped views with typed accessors.

use std::sync::Arc;

use crate::error::ConfigError;
use crate::store::{normalize_prefix, ConfigStore, KeyList};

/// Target of [`View::empty`]: holds nothing, accepts nothing.
#[derive(Debug)]
struct EmptyTarget;

impl ConfigStore for EmptyTarget {
    fn is_writable(&self) -> bool {
        false
    }

    fn get_string(&self, _key: &str) -> Option<String> {
        None
    }

    fn set_string(&self, _key: &str, _value: &str) -> Result<(), ConfigError> {
        Err(ConfigError::ReadOnlyTarget)
    }

    fn delete_value(&self, _key: &str) -> Result<(), ConfigError> {
        Err(ConfigError::ReadOnlyTarget)
    }

    fn list_keys(&self, _prefix: &str, _out: &mut KeyList, _direct: bool) {}
}

/// A prefix-scoped window onto any [`ConfigStore`].
///
/// A view prepends its prefix to every key it is asked about, so a view with
/// prefix `a.b` asked for `c.d` reads and writes `a.b.c.d` on its target. It
/// copies no data and holds no lock of its own; thread-safety is whatever
/// the target provides.
///
/// Sub-views compose prefixes eagerly: a view always points at the ultimate
/// non-view target with one flattened prefix string, so chains of views cost
/// a single indirection no matter how they were built.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use configstack::{ConfigStore, Layer, View};
///
/// let layer = Arc::new(Layer::new("settings"));
/// let server = View::new(layer, "server");
/// server.set_int("port", 8080)?;
/// server.set_bool("tls", true)?;
///
/// assert_eq!(server.get_int("port"), Some(8080));
/// assert_eq!(server.get_bool("tls"), Some(true));
/// # Ok::<(), configstack::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct View {
    prefix: String,
    target: Arc<dyn ConfigStore>,
    writable: bool,
}

impl View {
    /// Creates a writable view over `target` scoped to `prefix`.
    ///
    /// An empty prefix makes the view a transparent wrapper; otherwise the
    /// prefix is normalized to end with the segment separator.
    pub fn new(target: Arc<dyn ConfigStore>, prefix: &str) -> Self {
        Self {
            prefix: normalize_prefix(prefix),
            target,
            writable: true,
        }
    }

    /// Creates a permanently read-only view holding no values.
    ///
    /// Useful as a neutral placeholder where a `View` is required but no
    /// configuration exists.
    pub fn empty() -> Self {
        Self {
            prefix: String::new(),
            target: Arc::new(EmptyTarget),
            writable: false,
        }
    }

    /// Creates a writable sub-view scoped to `prefix` under this view.
    pub fn sub_view(&self, prefix: &str) -> Self {
        self.sub_view_impl(prefix, true)
    }

    /// Creates a read-only sub-view scoped to `prefix` under this view.
    ///
    /// The read-only restriction is local to the returned view; the parent
    /// and the target keep their own writability.
    pub fn sub_view_read_only(&self, prefix: &str) -> Self {
        self.sub_view_impl(prefix, false)
    }

    fn sub_view_impl(&self, prefix: &str, writable: bool) -> Self {
        // compose prefixes and share the ultimate target, so view chains
        // stay flat
        Self {
            prefix: self.derive_key(&normalize_prefix(prefix)),
            target: self.target.clone(),
            writable,
        }
    }

    fn derive_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// Gets the value for the given key as an integer.
    ///
    /// Accepts `0x`/`0X` hexadecimal, leading-zero octal and decimal forms,
    /// with an optional sign. Reports not-found if the value is absent or
    /// not parsable.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        parse_int_prefixed(&self.get_string(key)?)
    }

    /// Sets the value for the given key to the decimal form of `value`.
    pub fn set_int(&self, key: &str, value: i64) -> Result<(), ConfigError> {
        self.set_string(key, &value.to_string())
    }

    /// Gets the value for the given key as a boolean.
    ///
    /// Only the literals `true` and `false` parse; anything else is
    /// reported as not-found.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get_string(key)?.parse().ok()
    }

    /// Sets the value for the given key to `"true"` or `"false"`.
    pub fn set_bool(&self, key: &str, value: bool) -> Result<(), ConfigError> {
        self.set_string(key, if value { "true" } else { "false" })
    }
}

impl ConfigStore for View {
    fn is_writable(&self) -> bool {
        self.writable && self.target.is_writable()
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.target.get_string(&self.derive_key(key))
    }

    fn set_string(&self, key: &str, value: &str) -> Result<(), ConfigError> {
        if !self.writable {
            return Err(ConfigError::ReadOnlyView);
        }
        self.target.set_string(&self.derive_key(key), value)
    }

    fn delete_value(&self, key: &str) -> Result<(), ConfigError> {
        if !self.writable {
            return Err(ConfigError::ReadOnlyView);
        }
        self.target.delete_value(&self.derive_key(key))
    }

    fn list_keys(&self, prefix: &str, out: &mut KeyList, direct: bool) {
        self.target.list_keys(&self.derive_key(prefix), out, direct);
    }
}

/// Parses an integer honoring textual radix prefixes.
fn parse_int_prefixed(s: &str) -> Option<i64> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'-' => ("-", &s[1..]),
        b'+' => ("", &s[1..]),
        _ => ("", s),
    };

    let (radix, digits) = if let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        (16, hex)
    } else if rest.len() > 1 && rest.starts_with('0') {
        (8, &rest[1..])
    } else {
        (10, rest)
    };

    if digits.is_empty() {
        return None;
    }
    // re-attach the sign so i64::MIN parses
    i64::from_str_radix(&format!("{sign}{digits}"), radix).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Layer;

    fn collect(view: &View, prefix: &str, direct: bool) -> Vec<String> {
        let mut list = KeyList::new();
        view.list_keys(prefix, &mut list, direct);
        let mut v = list.into_vec();
        v.sort();
        v
    }

    fn sample_layer() -> Arc<Layer> {
        let l = Arc::new(Layer::new("test"));
        l.set_string("my.test.key.first", "1st").unwrap();
        l.set_string("my.test.key.onlymy", "2nd").unwrap();
        l.set_string("my.test.stuff", "mystuff").unwrap();
        l.set_string("your.test.key.first", "3rd").unwrap();
        l.set_string("your.test.stuff", "yourstuff").unwrap();
        l
    }

    #[test]
    fn prefix_scoping() {
        let l = sample_layer();

        // empty prefixes are transparent
        let root = View::new(l.clone(), "").sub_view("");
        assert_eq!(root.get_string("my.test.stuff").as_deref(), Some("mystuff"));
        assert_eq!(root.get_string("your.test.key.first").as_deref(), Some("3rd"));

        let my = root.sub_view("my");
        assert_eq!(my.get_string("my.test.key.first"), None);
        assert_eq!(my.get_string("test.key.first").as_deref(), Some("1st"));
        assert_eq!(my.get_string("test.stuff").as_deref(), Some("mystuff"));
        assert_eq!(my.get_string("test.key.onlyyour"), None);
    }

    #[test]
    fn composition_is_associative() {
        let l = sample_layer();

        let nested = View::new(l.clone(), "my").sub_view("test");
        let flat = View::new(l, "my.test");
        assert_eq!(
            nested.get_string("key.first"),
            flat.get_string("key.first")
        );
        assert_eq!(nested.get_string("stuff").as_deref(), Some("mystuff"));
    }

    #[test]
    fn read_only_sub_view() {
        let l = sample_layer();
        let v = View::new(l, "my");

        let rw = v.sub_view("test");
        assert!(rw.is_writable());
        rw.set_string("stuff", "123").unwrap();

        let ro = v.sub_view_read_only("test");
        assert!(!ro.is_writable());
        assert!(matches!(
            ro.set_string("stuff", "456"),
            Err(ConfigError::ReadOnlyView)
        ));
        assert!(matches!(
            ro.delete_value("stuff"),
            Err(ConfigError::ReadOnlyView)
        ));

        // the write through the writable sibling is visible
        assert_eq!(ro.get_string("stuff").as_deref(), Some("123"));
        assert_eq!(collect(&ro, "", true), vec!["key", "stuff"]);
    }

    #[test]
    fn delete_through_view() {
        let l = sample_layer();
        let v = View::new(l, "my").sub_view("test");

        v.delete_value("key.first").unwrap();
        assert_eq!(collect(&v, "", true), vec!["key", "stuff"]);

        v.delete_value("key.onlymy").unwrap();
        assert_eq!(collect(&v, "", true), vec!["stuff"]);
    }

    #[test]
    fn int_accessors() {
        let l = Arc::new(Layer::new("test"));
        let v = View::new(l.clone(), "");

        v.set_int("year", 2024).unwrap();
        v.set_int("neg", -7).unwrap();
        v.set_string("hex", "0xff").unwrap();
        v.set_string("oct", "0755").unwrap();
        v.set_string("numstart", "123text").unwrap();
        v.set_string("badoct", "09").unwrap();

        // canonical decimal text lands in the layer
        assert_eq!(l.get_string("year").as_deref(), Some("2024"));
        assert_eq!(l.get_string("neg").as_deref(), Some("-7"));

        assert_eq!(v.get_int("year"), Some(2024));
        assert_eq!(v.get_int("neg"), Some(-7));
        assert_eq!(v.get_int("hex"), Some(255));
        assert_eq!(v.get_int("oct"), Some(0o755));
        assert_eq!(v.get_int("numstart"), None);
        assert_eq!(v.get_int("badoct"), None);
        assert_eq!(v.get_int("missing"), None);
    }

    #[test]
    fn int_parse_edge_cases() {
        assert_eq!(parse_int_prefixed("0"), Some(0));
        assert_eq!(parse_int_prefixed("+42"), Some(42));
        assert_eq!(parse_int_prefixed("-0x10"), Some(-16));
        assert_eq!(parse_int_prefixed("0x"), None);
        assert_eq!(parse_int_prefixed(""), None);
        assert_eq!(parse_int_prefixed("-"), None);
        assert_eq!(parse_int_prefixed("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_int_prefixed("9223372036854775808"), None);
    }

    #[test]
    fn bool_accessors() {
        let l = Arc::new(Layer::new("test"));
        let v = View::new(l.clone(), "");

        v.set_bool("yes", true).unwrap();
        v.set_bool("no", false).unwrap();
        v.set_string("numeric", "1").unwrap();
        v.set_string("year", "2024").unwrap();

        assert_eq!(l.get_string("yes").as_deref(), Some("true"));
        assert_eq!(l.get_string("no").as_deref(), Some("false"));

        assert_eq!(v.get_bool("yes"), Some(true));
        assert_eq!(v.get_bool("no"), Some(false));
        // only the canonical literals parse
        assert_eq!(v.get_bool("numeric"), None);
        assert_eq!(v.get_bool("year"), None);
        assert_eq!(v.get_bool("missing"), None);
    }

    #[test]
    fn empty_view() {
        let v = View::empty();
        assert!(!v.is_writable());
        assert_eq!(v.get_string(""), None);
        assert_eq!(v.get_string("test"), None);

        assert!(matches!(
            v.set_string("key", "value"),
            Err(ConfigError::ReadOnlyView)
        ));
        assert!(matches!(v.delete_value("key"), Err(ConfigError::ReadOnlyView)));

        let mut list = KeyList::new();
        v.list_keys("", &mut list, true);
        assert!(list.is_empty());

        // even a writable sub-view fails at the inert target
        let sub = v.sub_view("x");
        assert!(!sub.is_writable());
        assert!(matches!(
            sub.set_string("key", "value"),
            Err(ConfigError::ReadOnlyTarget)
        ));
    }
}
