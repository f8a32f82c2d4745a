use std::{cell::RefCell, fs, path::PathBuf, rc::Rc};

use pretty_assertions::assert_eq;
use prosa::{Diagnostics, Registry, Session};

/// Builds a session whose `schreibe`/`schreibeZeile` write into a shared
/// buffer instead of stdout, through the same registry surface the real
/// standard library uses.
fn capturing_session() -> (Session, Rc<RefCell<String>>) {
    let output = Rc::new(RefCell::new(String::new()));
    let mut registry = Registry::standard();

    let sink = Rc::clone(&output);
    registry.define("schreibe", 1, move |args| {
                sink.borrow_mut().push_str(&args[0].to_string());
                Ok(None)
            });
    let sink = Rc::clone(&output);
    registry.define("schreibeZeile", 1, move |args| {
                sink.borrow_mut().push_str(&args[0].to_string());
                sink.borrow_mut().push('\n');
                Ok(None)
            });

    (Session::new(registry), output)
}

fn run(source: &str) -> (String, Diagnostics) {
    let (mut session, output) = capturing_session();
    let mut diagnostics = Diagnostics::new();
    session.run(source, None, &mut diagnostics);
    let captured = output.borrow().clone();
    (captured, diagnostics)
}

/// Runs a script that must execute without any diagnostic and returns its
/// output.
fn assert_success(source: &str) -> String {
    let (output, diagnostics) = run(source);
    assert!(!diagnostics.had_error() && !diagnostics.had_runtime_error(),
            "script failed:\n{source}\ndiagnostics: {:#?}",
            diagnostics.entries());
    output
}

/// Runs a script that must be rejected before execution begins.
fn assert_compile_error(source: &str) {
    let (_, diagnostics) = run(source);
    assert!(diagnostics.had_error(),
            "script was expected to be rejected:\n{source}");
}

/// Runs a script that must compile but fail at runtime.
fn assert_runtime_error(source: &str) -> Diagnostics {
    let (_, diagnostics) = run(source);
    assert!(!diagnostics.had_error(),
            "script did not compile:\n{source}\ndiagnostics: {:#?}",
            diagnostics.entries());
    assert!(diagnostics.had_runtime_error(),
            "script was expected to fail at runtime:\n{source}");
    diagnostics
}

#[test]
fn variable_declarations_and_literals() {
    assert_eq!(assert_success("die Zahl x ist 5.\nschreibe x."), "5");
    assert_eq!(assert_success("die Kommazahl k ist 2,5.\nschreibe k."), "2,5");
    assert_eq!(assert_success("die Zeichenkette s ist \"hallo\".\nschreibe s."), "hallo");
    assert_eq!(assert_success("das Zeichen z ist 'a'.\nschreibe z."), "a");
    assert_eq!(assert_success("der Boolean b ist wahr.\nschreibe b."), "wahr");
}

#[test]
fn boolean_condition_declarations() {
    assert_eq!(assert_success("der Boolean b ist wahr wenn 2 kleiner als 3 ist.\nschreibe b."),
               "wahr");
    assert_eq!(assert_success("der Boolean b ist falsch wenn 2 kleiner als 3 ist.\nschreibe b."),
               "falsch");
}

#[test]
fn article_type_agreement_is_enforced() {
    assert_compile_error("der Zahl x ist 5.");
    assert_compile_error("das Boolean b ist wahr.");
    assert_compile_error("die Zeichen z ist 'a'.");
}

#[test]
fn declared_type_is_checked_at_runtime() {
    assert_runtime_error("die Zahl x ist 2,5.");
    assert_runtime_error("die Kommazahl k ist \"text\".");
    assert_runtime_error("das Zeichen z ist 5.");
}

#[test]
fn arithmetic_and_precedence() {
    assert_eq!(assert_success("schreibe 2 plus 3 mal 4."), "14");
    assert_eq!(assert_success("schreibe ((2 plus 3) mal 4)."), "20");
    assert_eq!(assert_success("schreibe 7 modulo 3."), "1");
    assert_eq!(assert_success("schreibe 1 plus 2,5."), "3,5");
    assert_eq!(assert_success("schreibe (-5 plus 2)."), "-3");
}

#[test]
fn power_and_root() {
    assert_eq!(assert_success("schreibe 2 hoch 3."), "8");
    assert_eq!(assert_success("schreibe (2. wurzel von 16)."), "4");
    // Cube roots are not exact in floating point; check a bracket instead.
    let source = "die Kommazahl w ist 3. wurzel von 27.\n\
                  schreibe (w größer als 2,99 ist und w kleiner als 3,01 ist).";
    assert_eq!(assert_success(source), "wahr");
}

#[test]
fn text_concatenation() {
    assert_eq!(assert_success("schreibe \"a\" plus 1."), "a1");
    assert_eq!(assert_success("schreibe 2 plus \"b\"."), "2b");
    assert_eq!(assert_success("schreibe \"wert: \" plus wahr."), "wert: wahr");
}

#[test]
fn unary_operators() {
    assert_eq!(assert_success("schreibe nicht wahr."), "falsch");
    assert_eq!(assert_success("schreibe (der Betrag von -5)."), "5");
    assert_eq!(assert_success("schreibe (Sinus von 0)."), "0");
    assert_eq!(assert_success("schreibe (ln 1)."), "0");
}

#[test]
fn comparisons_and_suffix() {
    assert_eq!(assert_success("schreibe (3 größer als 2 ist)."), "wahr");
    assert_eq!(assert_success("schreibe (2 kleiner als 2 ist)."), "falsch");
    assert_eq!(assert_success("schreibe (2 kleiner als, oder gleich 2 ist)."), "wahr");
    assert_eq!(assert_success("schreibe (3 größer als, oder gleich 4 ist)."), "falsch");
    assert_eq!(assert_success("schreibe (2 gleich 2 ist)."), "wahr");
    assert_eq!(assert_success("schreibe (2 ungleich 3 ist)."), "wahr");
}

#[test]
fn equality_requires_identical_types() {
    assert_runtime_error("schreibe (1 gleich wahr ist).");
    assert_runtime_error("schreibe (1 gleich 1,0 ist).");
}

#[test]
fn logical_operators_short_circuit() {
    assert_eq!(assert_success("schreibe (wahr oder wahr plus 1)."), "wahr");
    assert_eq!(assert_success("schreibe (falsch und wahr plus 1)."), "falsch");
    assert_eq!(assert_success("schreibe (wahr und falsch)."), "falsch");
}

#[test]
fn bitwise_operators() {
    assert_eq!(assert_success("schreibe (logisch 6 und 3)."), "2");
    assert_eq!(assert_success("schreibe (logisch 6 oder 3)."), "7");
    assert_eq!(assert_success("schreibe (logisch 6 kontra 3)."), "5");
    assert_eq!(assert_success("schreibe (logisch nicht 0)."), "-1");
    assert_eq!(assert_success("schreibe (1 um 3 bit nach links verschoben)."), "8");
    assert_eq!(assert_success("schreibe (8 um 2 bit nach rechts verschoben)."), "2");
}

#[test]
fn bitwise_operators_reject_floats() {
    assert_runtime_error("schreibe (logisch 1,5 und 3).");
    assert_runtime_error("schreibe 5 modulo 2,5.");
}

#[test]
fn branches_take_the_right_arm() {
    let source = "wenn wahr, dann:\n\tschreibe \"A\".\nsonst:\n\tschreibe \"B\".";
    assert_eq!(assert_success(source), "A");

    let source = "wenn falsch, dann:\n\tschreibe \"A\".\nsonst:\n\tschreibe \"B\".";
    assert_eq!(assert_success(source), "B");
}

#[test]
fn wenn_aber_chains() {
    let source = "die Zahl x ist 2.\n\
                  wenn x gleich 1 ist, dann:\n\
                  \tschreibe \"eins\".\n\
                  wenn aber x gleich 2 ist, dann:\n\
                  \tschreibe \"zwei\".\n\
                  sonst:\n\
                  \tschreibe \"viele\".";
    assert_eq!(assert_success(source), "zwei");

    let source = "die Zahl x ist 9.\n\
                  wenn x gleich 1 ist, dann:\n\
                  \tschreibe \"eins\".\n\
                  wenn aber x gleich 2 ist, dann:\n\
                  \tschreibe \"zwei\".\n\
                  sonst:\n\
                  \tschreibe \"viele\".";
    assert_eq!(assert_success(source), "viele");
}

#[test]
fn conditions_must_be_boolean() {
    assert_runtime_error("wenn 1, dann:\n\tschreibe \"A\".");
    assert_runtime_error("solange 1, mache:\n\tschreibe \"A\".");
}

#[test]
fn while_loop_re_evaluates_its_condition() {
    let source = "die Zahl i ist 0.\n\
                  solange i kleiner als 3 ist, mache:\n\
                  \tschreibe i.\n\
                  \ti ist i plus 1.";
    assert_eq!(assert_success(source), "012");
}

#[test]
fn do_while_runs_at_least_once() {
    let source = "die Zahl i ist 9.\n\
                  mache:\n\
                  \tschreibe i.\n\
                  solange i kleiner als 0 ist.";
    assert_eq!(assert_success(source), "9");
}

#[test]
fn for_loop_counts_up_with_default_step() {
    let source = "für jede Zahl i von 1 bis 3, mache:\n\tschreibe i.";
    assert_eq!(assert_success(source), "123");
}

#[test]
fn for_loop_with_step_and_direction() {
    let source = "für jede Zahl i von 0 bis 6 mit schrittgröße 2, mache:\n\tschreibe i.";
    assert_eq!(assert_success(source), "0246");

    let source = "für jede Zahl i von 3 bis 1 mit schrittgröße -1, mache:\n\tschreibe i.";
    assert_eq!(assert_success(source), "321");
}

#[test]
fn four_spaces_count_as_one_indentation_level() {
    let source = "wenn wahr, dann:\n    schreibe \"A\".\nsonst:\n    schreibe \"B\".";
    assert_eq!(assert_success(source), "A");
}

#[test]
fn nested_blocks_scope_their_variables() {
    let source = ":\n\
                  \tdie Zahl x ist 1.\n\
                  \t:\n\
                  \t\tdie Zahl x ist 2.\n\
                  \t\tschreibe x.\n\
                  \tschreibe x.";
    assert_eq!(assert_success(source), "21");
}

#[test]
fn functions_declare_call_and_return() {
    let source = "die Funktion summe(Zahl a, Zahl b) vom Typ Zahl macht:\n\
                  \tgib a plus b zurück.\n\
                  schreibe summe(2, 5).";
    assert_eq!(assert_success(source), "7");
}

#[test]
fn functions_recurse() {
    let source = "die Funktion fakultät(Zahl n) vom Typ Zahl macht:\n\
                  \twenn n kleiner als, oder gleich 1 ist, dann:\n\
                  \t\tgib 1 zurück.\n\
                  \tgib n mal fakultät(n minus 1) zurück.\n\
                  schreibe fakultät(5).";
    assert_eq!(assert_success(source), "120");
}

#[test]
fn closures_capture_their_defining_environment() {
    let source = ":\n\
                  \tdie Zahl geheim ist 42.\n\
                  \tdie Funktion verrate() vom Typ Zahl macht:\n\
                  \t\tgib geheim zurück.\n\
                  \tschreibe verrate().";
    assert_eq!(assert_success(source), "42");
}

#[test]
fn closures_see_mutations_of_captured_variables() {
    let source = ":\n\
                  \tdie Zahl stand ist 0.\n\
                  \tdie Funktion erhöhe() macht:\n\
                  \t\tstand ist stand plus 1.\n\
                  \terhöhe().\n\
                  \terhöhe().\n\
                  \tschreibe stand.";
    assert_eq!(assert_success(source), "2");
}

#[test]
fn call_arity_is_checked() {
    let source = "die Funktion f(Zahl a, Zahl b) vom Typ Zahl macht:\n\
                  \tgib a plus b zurück.\n\
                  f(3).";
    let diagnostics = assert_runtime_error(source);
    let message = &diagnostics.entries()[0].message;
    assert!(message.contains('2') && message.contains('1'),
            "arity message should name expected and actual count: {message}");
}

#[test]
fn return_type_is_checked() {
    let source = "die Funktion f() vom Typ Zahl macht:\n\
                  \tgib 2,5 zurück.\n\
                  f().";
    assert_runtime_error(source);
}

#[test]
fn missing_return_is_a_parse_error() {
    let source = "die Funktion f() vom Typ Zahl macht:\n\tschreibe 1.";
    assert_compile_error(source);
}

#[test]
fn return_outside_a_function_is_rejected() {
    assert_compile_error("gib 5 zurück.");
}

#[test]
fn duplicate_declaration_in_one_scope_is_rejected() {
    let source = ":\n\tdie Zahl x ist 1.\n\tdie Zahl x ist 2.";
    assert_compile_error(source);
}

#[test]
fn reading_a_variable_in_its_own_initializer_is_rejected() {
    let source = ":\n\tdie Zahl a ist a.";
    assert_compile_error(source);
}

#[test]
fn operand_type_mismatch_reports_the_operator() {
    let diagnostics = assert_runtime_error("wahr plus 1.");
    assert_eq!(diagnostics.entries().len(), 1);
    assert!(diagnostics.entries()[0].location.contains("plus"),
            "diagnostic should point at the operator: {:?}",
            diagnostics.entries()[0]);
}

#[test]
fn only_callables_can_be_called() {
    assert_runtime_error("die Zahl x ist 5.\nx(1).");
}

#[test]
fn undefined_variables_are_runtime_errors() {
    assert_runtime_error("schreibe unbekannt.");
    assert_runtime_error("unbekannt ist 5.");
}

#[test]
fn division_by_zero_is_reported() {
    assert_runtime_error("schreibe 1 durch 0.");
    assert_runtime_error("schreibe 1 modulo 0.");
}

#[test]
fn arrays_literal_index_and_length() {
    let source = "die Zahlen xs sind [10; 20; 30].\nschreibe xs an der Stelle 2.";
    assert_eq!(assert_success(source), "20");

    let source = "die Zahlen xs sind [10; 20; 30].\nschreibe länge(xs).";
    assert_eq!(assert_success(source), "3");

    let source = "die Zeichenketten w sind [\"a\"; \"b\"].\nschreibe w an der Stelle 1.";
    assert_eq!(assert_success(source), "a");
}

#[test]
fn array_positions_start_at_one_and_are_bounds_checked() {
    assert_runtime_error("die Zahlen xs sind [1; 2].\nschreibe xs an der Stelle 0.");
    assert_runtime_error("die Zahlen xs sind [1; 2].\nschreibe xs an der Stelle 3.");
}

#[test]
fn array_positions_can_be_assigned() {
    let source = "die Zahlen xs sind [1; 2; 3].\n\
                  xs an der Stelle 2 ist 9.\n\
                  schreibe xs.";
    assert_eq!(assert_success(source), "[1; 9; 3]");
}

#[test]
fn stueck_allocates_zeroed_arrays() {
    assert_eq!(assert_success("die Zahlen xs sind 3 Stück.\nschreibe xs."), "[0; 0; 0]");
    assert_eq!(assert_success("die Zahlen xs sind 4 Stück.\nschreibe länge(xs)."), "4");
}

#[test]
fn plural_types_require_matching_elements() {
    assert_runtime_error("die Kommazahlen xs sind [1; 2].");
    assert_runtime_error("die Zahlen xs sind 5.");
}

#[test]
fn casts_convert_and_reject() {
    assert_eq!(assert_success("schreibe zuZahl(\"42\")."), "42");
    assert_eq!(assert_success("schreibe zuKommazahl(\"2,5\")."), "2,5");
    assert_eq!(assert_success("schreibe zuZeichenkette(7)."), "7");
    assert_eq!(assert_success("schreibe zuBoolean(\"wahr\")."), "wahr");
    assert_runtime_error("schreibe zuZahl(\"keine zahl\").");
}

#[test]
fn sessions_keep_state_between_runs() {
    let (mut session, output) = capturing_session();
    let mut diagnostics = Diagnostics::new();

    session.run("die Zahl x ist 1.", None, &mut diagnostics);
    session.run("die Funktion mehr(Zahl um) vom Typ Zahl macht:\n\tgib x plus um zurück.",
                None,
                &mut diagnostics);
    session.run("schreibe mehr(9).", None, &mut diagnostics);

    assert!(!diagnostics.had_error() && !diagnostics.had_runtime_error(),
            "diagnostics: {:#?}",
            diagnostics.entries());
    assert_eq!(*output.borrow(), "10");
}

#[test]
fn include_directive_splices_the_named_file() {
    let directory = PathBuf::from("tests/skripte");
    let source = fs::read_to_string(directory.join("haupt.prosa")).expect("fixture missing");

    let (mut session, output) = capturing_session();
    let mut diagnostics = Diagnostics::new();
    session.run(&source, Some(directory), &mut diagnostics);

    assert!(!diagnostics.had_error() && !diagnostics.had_runtime_error(),
            "diagnostics: {:#?}",
            diagnostics.entries());
    assert_eq!(*output.borrow(), "81");
}

#[test]
fn missing_include_is_a_diagnostic_not_a_crash() {
    let source = "binde \"gibt_es_nicht.prosa\" ein.\nschreibe 1.";
    let (_, diagnostics) = run(source);
    assert!(diagnostics.had_error());
    // The including file's own tokens are unaffected by the failed splice.
    assert!(diagnostics.entries()
                       .iter()
                       .all(|entry| entry.message.contains("gibt_es_nicht")));
}

#[test]
fn lexical_errors_do_not_abort_the_scan() {
    let (_, diagnostics) = run("die Zahl x ist 5 $ § 3.");
    assert!(diagnostics.had_error());
    assert!(diagnostics.entries().len() >= 2,
            "both offending characters should be reported: {:#?}",
            diagnostics.entries());
}

#[test]
fn unterminated_literals_are_reported() {
    assert_compile_error("die Zeichenkette s ist \"offen.");
    assert_compile_error("das Zeichen z ist 'ab'.");
}

#[test]
fn mixed_array_literals_are_rejected() {
    assert_compile_error("die Zahlen xs sind [1; \"zwei\"].");
}

#[test]
fn parse_errors_recover_and_collect() {
    // Two statements with independent errors; both must be reported.
    let (_, diagnostics) = run("die Zahl ist 5.\nwenn wahr dann:\n\tschreibe 1.");
    assert!(diagnostics.had_error());
    assert!(diagnostics.entries().len() >= 2,
            "expected two independent parse errors: {:#?}",
            diagnostics.entries());
}
