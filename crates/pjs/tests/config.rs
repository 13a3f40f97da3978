use pjs::{source, PipelineConfig, PipelineError, WriteSink};

fn run(config: &PipelineConfig, input: &str) -> Result<String, PipelineError> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut pipeline = config.build()?;
    let mut sink = WriteSink::new(Vec::new());
    pipeline.run(source::Lines::new(input.as_bytes()), &mut sink)?;
    Ok(String::from_utf8(sink.into_inner()).unwrap_or_default())
}

#[test]
fn loads_from_toml() {
    let config: PipelineConfig = toml::from_str(
        r#"
        filter = "length > 1"
        map = "toUpperCase()"
        text = true
        "#,
    )
    .unwrap();
    assert_eq!(config.filter.as_deref(), Some("length > 1"));
    assert!(config.text && !config.json);
    assert_eq!(run(&config, "a\nbc\nde\n").unwrap(), "BC\nDE\n");
}

#[test]
fn text_applies_to_the_last_expression_stage_only() {
    let config = PipelineConfig {
        map: Some("length".into()),
        reduce: Some("sum".into()),
        text: true,
        ..Default::default()
    };
    assert_eq!(run(&config, "ab\ncde\n").unwrap(), "5\n");
}

#[test]
fn json_single_documents() {
    let config = PipelineConfig {
        map: Some("{line: $, i}".into()),
        json: true,
        ..Default::default()
    };
    assert_eq!(run(&config, "x\n").unwrap(), r#"{"line":"x","i":0}"#);
}

#[test]
fn json_array_of_a_reduce_result() {
    let config = PipelineConfig {
        reduce: Some("concat".into()),
        json_array: true,
        ..Default::default()
    };
    assert_eq!(run(&config, "a\nb\n").unwrap(), "[\n\"ab\"\n]\n");
}

#[test]
fn ignore_blanks_drops_interior_blank_lines() {
    let config = PipelineConfig {
        map: Some("'<' + $ + '>'".into()),
        ignore_blanks: true,
        text: true,
        ..Default::default()
    };
    assert_eq!(run(&config, "a\n\nb\n").unwrap(), "<a>\n<b>\n");

    let config = PipelineConfig {
        ignore_blanks: false,
        ..config
    };
    assert_eq!(run(&config, "a\n\nb\n").unwrap(), "<a>\n<>\n<b>\n");
}

#[test]
fn explicit_binding() {
    let config: PipelineConfig = toml::from_str(
        r#"
        map = "$.length"
        explicit = true
        text = true
        "#,
    )
    .unwrap();
    assert_eq!(run(&config, "abc\n").unwrap(), "3\n");

    let config = PipelineConfig {
        map: Some("length".into()),
        ..config
    };
    assert!(matches!(run(&config, "abc\n"), Err(PipelineError::Evaluation(_))));
}
