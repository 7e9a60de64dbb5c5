/// Template written by `triage --init`.
pub fn generate_init_template() -> String {
	r#"# Stack triage configuration.
# Files named .triage.toml are looked up from the working directory upwards,
# then in ~/.triage.toml. The nearest file wins for each setting.

# Stop looking in parent directories.
root = true

# Rule file, relative to this file. Each line is <frame>=<followup>:
#   module!routine=followup   exact frame (either side may use *)
#   module*=followup          any routine in module
#   *routine=followup         routine in any module
# A followup of "ignore" skips the frame. Lines starting with ; are comments.
rules = "triage.ini"

# Reject duplicate module!routine rules instead of letting the last one win.
strict = false

# Also write the analysis report to this file.
# output = "triage-report.txt"
"#
	.to_string()
}
