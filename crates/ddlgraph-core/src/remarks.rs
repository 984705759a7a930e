use crate::render::RenderOptions;

/// Length of a remark as the target dialect counts it: characters outside
/// 0..=127 weigh two.
pub fn remark_weight(text: &str) -> usize {
    text.chars()
        .map(|ch| if u32::from(ch) > 127 { 2 } else { 1 })
        .sum()
}

pub fn needs_script_marker(text: &str, threshold: usize) -> bool {
    remark_weight(text) >= threshold
}

pub fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

/// Render `COMMENT ON <target> IS '<remark>'`, or nothing when there is no
/// remark or remarks are disabled.
pub fn render_comment(target: &str, remark: Option<&str>, opts: &RenderOptions) -> String {
    let Some(remark) = remark.filter(|value| !value.is_empty()) else {
        return String::new();
    };
    if !opts.include_remarks {
        return String::new();
    }

    let marker = if needs_script_marker(remark, opts.remark_script_threshold) {
        tracing::debug!(event = "remark_script_marker", target = %target);
        opts.remark_script_marker.as_str()
    } else {
        ""
    };

    opts.statement(&format!(
        "{marker}COMMENT ON {target} IS {}",
        quote_literal(remark)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multibyte_characters_weigh_double() {
        assert_eq!(remark_weight("abc"), 3);
        assert_eq!(remark_weight("åäö"), 6);
    }

    #[test]
    fn long_remark_gets_marker() {
        let opts = RenderOptions::default();
        let long = "x".repeat(260);
        let rendered = render_comment("TABLE APP.T", Some(&long), &opts);
        assert!(rendered.starts_with("echo COMMENT ON TABLE APP.T IS '"));

        let short = "x".repeat(200);
        let rendered = render_comment("TABLE APP.T", Some(&short), &opts);
        assert!(rendered.starts_with("COMMENT ON TABLE APP.T IS '"));
    }

    #[test]
    fn threshold_is_inclusive_and_counts_multibyte() {
        let opts = RenderOptions::default();
        let exact = "x".repeat(255);
        assert!(render_comment("TABLE A.B", Some(&exact), &opts).starts_with("echo "));

        let wide = "ä".repeat(128);
        assert!(needs_script_marker(&wide, opts.remark_script_threshold));
        assert!(!needs_script_marker(&"ä".repeat(127), opts.remark_script_threshold));
    }

    #[test]
    fn quotes_are_doubled() {
        let opts = RenderOptions::default();
        let rendered = render_comment("TABLE APP.T", Some("owner's data"), &opts);
        assert_eq!(rendered, "COMMENT ON TABLE APP.T IS 'owner''s data' @\n\n");
    }

    #[test]
    fn empty_or_disabled_remarks_render_nothing() {
        let mut opts = RenderOptions::default();
        assert_eq!(render_comment("TABLE A.B", None, &opts), "");
        assert_eq!(render_comment("TABLE A.B", Some(""), &opts), "");
        opts.include_remarks = false;
        assert_eq!(render_comment("TABLE A.B", Some("note"), &opts), "");
    }
}
