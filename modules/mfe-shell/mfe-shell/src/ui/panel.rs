use mfe_shell_sdk::DiagnosticPanel;

/// Diagnostic panel for a remote that failed to load or mount.
#[must_use]
pub fn diagnostic_panel(name: &str, tech: &str, port: Option<u16>) -> DiagnosticPanel {
    DiagnosticPanel {
        title: format!("{name} MFE Unavailable"),
        description: format!("The {name} micro-frontend ({tech}) is currently not responding."),
        port_hint: port.map(|p| format!("Expected on port {p}")),
        remediation: vec![
            "Open a new terminal".to_owned(),
            "Navigate to the MFE directory".to_owned(),
            "Run: npm start".to_owned(),
            "Refresh this page".to_owned(),
        ],
        footnote: "The rest of the shell keeps working: each micro-frontend is isolated, \
                   so one failure does not affect the others."
            .to_owned(),
    }
}

/// Markup for DOM surfaces. All text is escaped.
#[must_use]
pub fn render_panel_html(panel: &DiagnosticPanel) -> String {
    let port = panel.port_hint.as_ref().map_or_else(String::new, |hint| {
        format!("<p class=\"mfe-error-port\">{}</p>", escape(hint))
    });
    let steps: String = panel
        .remediation
        .iter()
        .map(|step| format!("<li>{}</li>", escape(step)))
        .collect();

    format!(
        "<div class=\"mfe-error\" role=\"alert\">\
         <h3>{title}</h3><p>{description}</p>{port}\
         <ol class=\"mfe-error-steps\">{steps}</ol>\
         <p class=\"mfe-error-note\">{footnote}</p></div>",
        title = escape(&panel.title),
        description = escape(&panel.description),
        footnote = escape(&panel.footnote),
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn panel_names_remote_tech_and_port() {
        let panel = diagnostic_panel("Cart", "Vue", Some(3002));
        assert_eq!(panel.title, "Cart MFE Unavailable");
        assert!(panel.description.contains("Cart micro-frontend (Vue)"));
        assert_eq!(panel.port_hint.as_deref(), Some("Expected on port 3002"));
        assert_eq!(panel.remediation.len(), 4);
    }

    #[test]
    fn port_line_is_omitted_when_unknown() {
        let panel = diagnostic_panel("Cart", "Vue", None);
        assert!(panel.port_hint.is_none());
        assert!(!render_panel_html(&panel).contains("mfe-error-port"));
    }

    #[test]
    fn html_escapes_remote_supplied_text() {
        let panel = diagnostic_panel("<img src=x onerror=alert(1)>", "R&D", None);
        let html = render_panel_html(&panel);
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt; MFE Unavailable"));
        assert!(html.contains("(R&amp;D)"));
    }
}
