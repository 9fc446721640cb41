use flagwise::{AccessError, Args, Outcome, ParseError};

fn greet() -> Args {
    let mut args = Args::new();
    args.add_required_flag_value("--name", "-n", "Who to greet")
        .add_optional_flag("--verbose", "-v", "Print more")
        .disable_exit()
        .disable_usage();
    args
}

#[test]
fn end_to_end_name_and_verbose() {
    let mut args = greet();
    let outcome = args
        .initialize(["prog", "--name", "Alice", "-v"])
        .expect("command line should be accepted");
    assert_eq!(outcome, Outcome::Ready);
    assert!(args.has("--verbose"));
    assert!(args.has("-v"));
    assert_eq!(args.get_as_string("--name"), Ok("Alice"));
    assert_eq!(args.get_as_string("-n"), Ok("Alice"));
    assert!(args.non_flags().is_empty());
}

#[test]
fn only_unknown_tokens_fail_without_declarations() {
    for argv in [
        vec!["prog", "x"],
        vec!["prog", "--x", "-y"],
        vec!["prog", "a=b", "c", "d"],
    ] {
        let mut args = Args::new();
        args.disable_help();
        assert_eq!(args.parse(argv.clone()), Err(ParseError::UnknownArguments), "{argv:?}");
        assert_eq!(args.parse(argv).unwrap_err().to_string(), "unknown arguments");
    }
}

#[test]
fn split_and_separate_value_forms_agree() {
    for value in ["Alice", "a b", "x=y", "-v", "0x10"] {
        let joined = format!("--name={value}");
        let mut split = greet();
        split.parse(["prog", joined.as_str()]).unwrap();
        let mut separate = greet();
        separate.parse(["prog", "--name", value]).unwrap();
        assert_eq!(split.get_as_string("--name"), separate.get_as_string("--name"));
        assert_eq!(split.get_as_string("--name"), Ok(value));
    }
}

#[test]
fn alias_and_primary_are_equivalent_after_parse() {
    let inputs: [&[&str]; 4] = [
        &["prog", "-n", "x"],
        &["prog", "--name", "x", "--verbose"],
        &["prog", "-v", "-n=x"],
        &["prog", "--name=x", "-v"],
    ];
    for argv in inputs {
        let mut args = greet();
        args.parse(argv.iter().copied()).unwrap();
        for (primary, alias) in [("--name", "-n"), ("--verbose", "-v")] {
            assert_eq!(args.has(primary), args.has(alias), "{argv:?}");
            assert_eq!(
                args.get_as_string(primary).ok(),
                args.get_as_string(alias).ok(),
                "{argv:?}"
            );
        }
    }
}

#[test]
fn optional_fallback_is_available_under_both_spellings() {
    let mut args = greet();
    args.add_optional_flag_value_default("--greeting", "-g", "Greeting word", "Hello");
    assert_eq!(args.initialize(["prog", "-n", "Bob"]), Ok(Outcome::Ready));
    assert_eq!(args.get_as_string("--greeting"), Ok("Hello"));
    assert_eq!(args.get_as_string("-g"), Ok("Hello"));
}

#[test]
fn given_value_beats_fallback() {
    let mut args = greet();
    args.add_optional_flag_value_default("--greeting", "-g", "Greeting word", "Hello");
    args.initialize(["prog", "-n", "Bob", "-g", "Hi"]).unwrap();
    assert_eq!(args.get_as_string("--greeting"), Ok("Hi"));
    assert_eq!(args.get_as_string("-g"), Ok("Hi"));
}

#[test]
fn fallback_is_not_applied_on_failure() {
    let mut args = greet();
    args.add_optional_flag_value_default("--greeting", "-g", "Greeting word", "Hello");
    assert!(args.initialize(["prog"]).is_err());
    assert!(matches!(
        args.get_as_string("--greeting"),
        Err(AccessError::NotFound { .. })
    ));
}

#[test]
fn required_fallback_does_not_satisfy_required_check() {
    let mut args = Args::new();
    args.add_required_flag_value_default("--mode", "-m", "Mode", "fast");
    let err = args.parse(["prog"]).unwrap_err();
    assert_eq!(err.to_string(), "must specify --mode");
}

#[test]
fn missing_required_flag_is_named() {
    let mut args = greet();
    let err = args.initialize(["prog", "-v"]).unwrap_err();
    let message = err.to_string();
    assert!(!message.is_empty());
    assert!(message.contains("--name") || message.contains("-n"));
}

#[test]
fn exact_non_flag_count() {
    for (count, ok) in [(2usize, false), (3, true), (4, false)] {
        let mut args = greet();
        args.require_non_flags(3);
        let mut argv = vec!["prog".to_string(), "-n".to_string(), "x".to_string()];
        argv.extend((0..count).map(|i| format!("file{i}")));
        let res = args.parse(argv);
        assert_eq!(res.is_ok(), ok, "{count} non-flags");
        if !ok {
            assert_eq!(res, Err(ParseError::NonFlagCount { expected: 3 }));
        }
    }
}

#[test]
fn numeric_accessors_check_range() {
    let mut args = Args::new();
    args.add_optional_flag_value("--small", "", "")
        .add_optional_flag_value("--max", "", "")
        .add_optional_flag_value("--neg", "", "");
    args.parse(["prog", "--small=300", "--max=255", "--neg=-1"])
        .unwrap();
    assert!(matches!(args.get_as_u8("--small"), Err(AccessError::Range { .. })));
    assert_eq!(args.get_as_u8("--max"), Ok(255));
    assert!(matches!(args.get_as_u8("--neg"), Err(AccessError::Range { .. })));
    assert!(matches!(args.get_as_u64("--neg"), Err(AccessError::Range { .. })));
    assert_eq!(args.get_as_i8("--neg"), Ok(-1));
    assert_eq!(args.get_as_f32("--max"), Ok(255.0));
}

#[test]
fn usage_generation_is_idempotent() {
    let mut args = greet();
    args.require_non_flags(1);
    args.initialize(["prog", "-n", "x", "file"]).unwrap();
    let first = args.usage();
    args.generate_usage();
    assert_eq!(first, args.usage());
    assert!(first.starts_with("Usage: prog "));
    assert!(first.contains("<--> nonflag1 \n"));
}

#[test]
fn overrides_set_before_initialize_survive() {
    let mut args = greet();
    args.set_preamble("greet NAME\n").set_epilogue("\nMore at example.org\n");
    args.initialize(["prog", "-n", "x"]).unwrap();
    assert_eq!(args.preamble(), "greet NAME\n");
    assert!(args.flag_description().contains("Required flags"));
    assert!(args.usage().ends_with("\nMore at example.org\n"));
}

#[test]
fn declared_flag_after_all_flags_seen_is_a_non_flag() {
    let mut args = Args::new();
    args.add_optional_flag("--verbose", "-v", "")
        .require_non_flags(1);
    args.parse(["prog", "-v", "--verbose"]).unwrap();
    assert_eq!(args.non_flags(), ["--verbose"]);
}
