//! Font descriptor for bullet labels.

/// Font configuration for text rendering.
///
/// Passed through the render context so bullet labels on the canvas and in
/// the toolbar preview use the same face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontDescriptor {
    /// Font family name (e.g., "Sans", "DejaVu Sans", "Arial")
    pub family: String,

    /// Font weight (e.g., "normal", "bold", "light" or numeric 100-900)
    pub weight: String,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            family: "Sans".to_string(),
            weight: "bold".to_string(),
        }
    }
}

impl FontDescriptor {
    pub fn new(family: impl Into<String>, weight: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            weight: weight.into(),
        }
    }

    /// Converts this font descriptor to a Pango font description string.
    ///
    /// Format: "Family Weight Size", e.g. "Sans Bold 48".
    pub fn to_pango_string(&self, size: f64) -> String {
        let mut parts = vec![self.family.clone()];

        if !self.weight.eq_ignore_ascii_case("normal") {
            parts.push(capitalize_first(&self.weight));
        }

        parts.push(format!("{}", size.round() as i32));
        parts.join(" ")
    }

    /// Parsed Pango description at `size` points.
    pub fn pango_description(&self, size: f64) -> pango::FontDescription {
        pango::FontDescription::from_string(&self.to_pango_string(size))
    }
}

/// Capitalizes the first letter of a string.
fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_bold_sans() {
        assert_eq!(FontDescriptor::default().to_pango_string(48.0), "Sans Bold 48");
    }

    #[test]
    fn normal_weight_is_omitted() {
        let font = FontDescriptor::new("DejaVu Sans", "normal");
        assert_eq!(font.to_pango_string(23.6), "DejaVu Sans 24");
    }

    #[test]
    fn numeric_weight_is_kept() {
        let font = FontDescriptor::new("Arial", "700");
        assert_eq!(font.to_pango_string(12.0), "Arial 700 12");
    }
}
