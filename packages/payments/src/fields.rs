// ABOUTME: Form-encoded fields of a payment notification
// ABOUTME: Keeps the body exactly as received so the verification echo matches what was sent

use url::form_urlencoded;

/// Directive appended to the echoed fields when asking the processor to verify them
pub const VERIFY_DIRECTIVE: &str = "cmd=_notify-validate";

/// A notification body as received, plus its decoded pairs for lookups
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    raw: String,
    pairs: Vec<(String, String)>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode an `application/x-www-form-urlencoded` body
    ///
    /// Percent escapes are kept verbatim in the echo, so bodies in any
    /// charset (`charset=windows-1252` included) verify unchanged.
    pub fn parse(body: &[u8]) -> Self {
        let pairs = form_urlencoded::parse(body)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        Self {
            raw: String::from_utf8_lossy(body).into_owned(),
            pairs,
        }
    }

    /// First decoded value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The body exactly as the processor sent it
    pub fn as_received(&self) -> &str {
        &self.raw
    }

    /// The body sent back to the processor for verification
    pub fn verification_message(&self) -> String {
        if self.raw.is_empty() {
            VERIFY_DIRECTIVE.to_string()
        } else {
            format!("{}&{}", self.raw, VERIFY_DIRECTIVE)
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let pairs: Vec<(String, String)> = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let raw = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs.iter())
            .finish();

        Self { raw, pairs }
    }
}
