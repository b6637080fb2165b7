#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use ember::{Ember, EmberError, Output, Settings};
	use expect_test::expect;

	fn program(name: &str) -> PathBuf { PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("programs").join(name) }

	fn ember() -> (Ember, Output) {
		let output = Output::buffer();
		(Ember::new(Settings::default()).with_output(output.clone()), output)
	}

	#[test]
	fn run_functions_file() {
		let (ember, output) = ember();
		let trace = ember.run_file(program("functions.em")).unwrap();
		assert_eq!(trace.len(), 9);
		assert_eq!(output.captured().as_deref(), Some("12 2.5"));
	}

	#[test]
	fn run_branches_file() {
		let (ember, output) = ember();
		ember.run_file(program("branches.em")).unwrap();
		assert_eq!(output.captured().as_deref(), Some("negative,zero,positive"));
	}

	#[test]
	fn syntax_errors_are_all_reported() {
		let (ember, output) = ember();
		let error = ember.run_file(program("syntax_errors.em")).unwrap_err();
		let EmberError::SyntaxErrors(errors) = &error else { panic!("{error:?}") };
		let lines: Vec<_> = errors.iter().map(|error| (error.span.start.line + 1, error.message.as_str())).collect();
		assert_eq!(lines, vec![
			(1, "Expected INT, FLOAT, STRING, IDENTIFIER, '+', '-', '!', '(', '['"),
			(2, "Expected INT, FLOAT, STRING, IDENTIFIER, '+', '-', '!', '(', '['"),
			(3, "Expected ';'"),
		]);
		assert_eq!(output.captured().as_deref(), Some(""));
	}

	#[test]
	fn runtime_error_traceback() {
		let (ember, output) = ember();
		let path = program("runtime_error.em");
		let error = ember.run_file(&path).unwrap_err().to_string();
		let error = error.replace(&path.display().to_string(), "runtime_error.em");
		expect![[r#"
            Traceback (most recent call last):
              File runtime_error.em, line 6, in <program>
              File runtime_error.em, line 2, in half
            RuntimeError: Division by 0"#]]
		.assert_eq(&error);
		assert_eq!(output.captured().as_deref(), Some("before"));
	}

	#[test]
	fn ast_dump() {
		let (ember, _) = ember();
		let program = ember.ast_file(program("arithmetic.em")).unwrap();
		expect![" [ (INT:1 PLUS (INT:2 ASTERISK INT:3)) ]  [ ((INT:10 MINUS INT:4) SLASH INT:2) ] "]
			.assert_eq(&program.to_string());
	}

	#[test]
	fn emit_arithmetic() {
		let (ember, _) = ember();
		let source = std::fs::read_to_string(program("arithmetic.em")).unwrap();
		assert_eq!(ember.emit(&source).unwrap(), vec![
			3, 0, 1, 3, 0, 2, 3, 0, 3, 7, 5, 3, 0, 10, 3, 0, 4, 6, 3, 0, 2, 8, 9
		]);
	}

	#[test]
	fn trace_is_stable_across_runs() {
		let source = std::fs::read_to_string(program("functions.em")).unwrap();
		let (ember, output) = ember();
		let first = ember.run_source(&source).unwrap();
		let second = ember.run_source(&source).unwrap();
		assert_eq!(first, second);
		assert_eq!(output.captured().as_deref(), Some("12 2.512 2.5"));
	}
}
