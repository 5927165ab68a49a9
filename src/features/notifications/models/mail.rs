use crate::features::sightings::models::Sighting;

/// A mail document waiting to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl OutgoingMail {
    pub fn new_sighting(to: &str, sighting: &Sighting) -> Self {
        Self {
            to: to.to_string(),
            subject: format!("New GaiGi entry ({}) !", env!("CARGO_PKG_VERSION")),
            html: format!(
                "Someone entered a <b>new</b> entry.<br/>Type: {}<br/>Description: {}",
                sighting.category,
                escape_html(&sighting.note)
            ),
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"
        );
    }
}
