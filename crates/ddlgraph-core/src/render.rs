/// Threshold (weighted characters) at which a comment literal must be run
/// through the script marker instead of as a plain statement.
pub const REMARK_SCRIPT_THRESHOLD: usize = 255;

/// Formatting knobs for rendered DDL.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Statement terminator appended to every statement.
    pub terminator: String,
    /// Emit a `--#SET TERMINATOR` directive at the top of each script or file.
    pub terminator_directive: bool,
    /// Emit `COMMENT ON` statements for remarks.
    pub include_remarks: bool,
    pub remark_script_threshold: usize,
    /// Prefix for oversized comment statements.
    pub remark_script_marker: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            terminator: "@".to_string(),
            terminator_directive: true,
            include_remarks: true,
            remark_script_threshold: REMARK_SCRIPT_THRESHOLD,
            remark_script_marker: "echo ".to_string(),
        }
    }
}

impl RenderOptions {
    /// Terminate a statement body and separate it from the next one.
    pub fn statement(&self, body: &str) -> String {
        format!("{} {}\n\n", body.trim_end(), self.terminator)
    }

    pub fn directive(&self) -> Option<String> {
        self.terminator_directive
            .then(|| format!("--#SET TERMINATOR {}\n\n", self.terminator))
    }
}

/// Canonical form of catalog-stored SQL text: trailing whitespace removed
/// from every line and blank lines dropped.
pub fn normalize_text(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
