use super::syntax::PythonSyntax;
use crate::backend::{check_target, one_line, quoted};
use crate::compiler::{Code, DiagnosticKind, EmitContext};
use crate::expression::{Piece, ValueForm, ValueSyntax};
use crate::graph::fields::choice_key;
use crate::graph::{
    Action, AssertStep, CaptureStep, Check, Condition, CustomCallStep, DelayStep, ElementStep,
    EntryStep, InteractStep, LoadFixtureStep, NetworkRuleStep, RepeatMode, RepeatStep,
    SetVariableStep, SourceRole,
};
use crate::selector::{LocatorKind, Selector};
use itertools::Itertools;

/// `By.<STRATEGY>, <value>` arguments for `find_element`.
pub(super) fn locate(element: &ElementStep) -> String {
    let selector = Selector::of(element);
    let strategy = match selector.kind {
        LocatorKind::Id => "By.ID",
        LocatorKind::Css => "By.CSS_SELECTOR",
        LocatorKind::XPath => "By.XPATH",
        LocatorKind::Name => "By.NAME",
        LocatorKind::LinkText => "By.LINK_TEXT",
    };
    format!("{}, {}", strategy, selector.value.render(&PythonSyntax))
}

/// The translated value, coerced to `str` unless it already is one.
fn as_text(ctx: &EmitContext<'_>, raw: &str) -> String {
    let form = ValueForm::classify(raw);
    let rendered = form.render(ctx.syntax());
    if form.is_string() {
        rendered
    } else {
        format!("str({})", rendered)
    }
}

fn note(code: &mut Code, text: &str) {
    code.line(format!("# {}", one_line(text)));
}

fn webdriver_class(browser: &str) -> Option<&'static str> {
    match choice_key(browser).as_str() {
        "chrome" | "googlechrome" | "chromium" => Some("Chrome"),
        "firefox" | "mozillafirefox" => Some("Firefox"),
        "edge" | "microsoftedge" => Some("Edge"),
        "safari" => Some("Safari"),
        _ => None,
    }
}

pub(super) fn entry_point(entry: &EntryStep, ctx: &EmitContext<'_>) -> String {
    let mut code = ctx.code();
    if !ctx.is_root() {
        ctx.warn(
            DiagnosticKind::MisplacedStep,
            "entry point reached through a flow connection, session setup skipped",
        );
        note(&mut code, "Entry point reached mid-flow: session setup skipped");
        return code.finish();
    }

    let class = webdriver_class(&entry.browser).unwrap_or_else(|| {
        ctx.warn(
            DiagnosticKind::UnrecognizedValue,
            format!("browser '{}' has no Selenium driver, using Chrome", entry.browser),
        );
        "Chrome"
    });

    code.line(format!(
        "log_info({})",
        quoted(&format!("Browser: {}, URL: {}", entry.browser, entry.url))
    ));
    code.line(format!("driver = webdriver.{}()", class))
        .line("driver.maximize_window()")
        .line(format!("driver.get({})", ctx.translate(&entry.url)))
        .line("time.sleep(2)");
    if entry.clear_cookies {
        code.line("driver.delete_all_cookies()");
    }
    if entry.clear_local_storage {
        code.line(r#"driver.execute_script("window.localStorage.clear();")"#);
    }
    if entry.clear_session_storage {
        code.line(r#"driver.execute_script("window.sessionStorage.clear();")"#);
    }
    code.finish()
}

pub(super) fn interact(step: &InteractStep, ctx: &EmitContext<'_>) -> String {
    let mut code = ctx.code();
    let Some(element) = ctx.element() else {
        ctx.warn(
            DiagnosticKind::MissingElement,
            format!("'{}' action has no element connected", step.action.label()),
        );
        note(&mut code, "Warning: Interact step has no element connected");
        code.line(r#"log_info("Warning: Interact step has no element connected")"#);
        return code.finish();
    };

    let base = format!("driver.find_element({})", locate(&element));
    code.line(format!(
        "log_step({})",
        quoted(&format!("Action: {} on '{}'", step.action.label(), element.name))
    ));
    match &step.action {
        Action::Click => {
            code.line(format!("{}.click()", base));
        }
        Action::Type => {
            code.line(format!("{}.send_keys({})", base, as_text(ctx, &step.value)));
        }
        Action::Clear => {
            code.line(format!("{}.clear()", base));
        }
        Action::Hover => {
            code.line(format!("element = {}", base))
                .line("webdriver.ActionChains(driver).move_to_element(element).perform()");
        }
        Action::CaptureText => match &step.save_to {
            Some(var) => {
                code.line(format!("txt_val = {}.text", base))
                    .line(format!("self.vars[{}] = txt_val", quoted(var)))
                    .line(format!(
                        "log_info({} + txt_val)",
                        quoted(&format!("Saved text to variable '{}': ", var))
                    ));
            }
            None => {
                ctx.warn(
                    DiagnosticKind::MissingVariable,
                    "'Get Text' action has no variable to save into",
                );
                note(&mut code, "Warning: Get Text has no variable to save into, skipped");
            }
        },
        Action::Unrecognized(raw) => {
            ctx.warn(
                DiagnosticKind::UnrecognizedValue,
                format!("unknown action '{}'", raw),
            );
            code.line(format!(
                "log_info({})",
                quoted(&format!("Unknown action '{}'", raw))
            ));
        }
    }
    code.finish()
}

pub(super) fn assert(step: &AssertStep, ctx: &EmitContext<'_>) -> String {
    let check = &step.check;
    let mut code = ctx.code();
    if check.condition == Condition::NetworkStatus {
        ctx.warn(
            DiagnosticKind::Unsupported,
            "network status assertions are not supported by Selenium",
        );
        note(
            &mut code,
            &format!(
                "Assert Network Status: @{} == {}",
                check.network_alias, check.expected_status
            ),
        );
        note(&mut code, "Note: Selenium does not support native network assertion.");
        note(&mut code, "Consider using selenium-wire for network inspection.");
        return code.finish();
    }

    let element = match check_target(check, ctx) {
        Ok(element) => element,
        Err(reason) => {
            note(&mut code, &reason);
            return code.finish();
        }
    };
    let name = element.as_ref().map(|e| e.name.clone()).unwrap_or_default();
    let locator = element.as_ref().map(locate).unwrap_or_default();
    let value = as_text(ctx, &check.value);

    code.line(format!(
        "log_step({})",
        quoted(&format!("Asserting: {}", check.condition.label()))
    ));
    let (assertion, message) = match &check.condition {
        Condition::Visible => (
            format!("driver.find_element({}).is_displayed()", locator),
            format!("Element '{}' is visible", name),
        ),
        Condition::ContainsText => {
            code.line(format!("el = driver.find_element({})", locator))
                .line(r#"txt = el.text or el.get_attribute("value") or """#);
            (
                format!("{} in txt", value),
                format!("Element '{}' contains text", name),
            )
        }
        Condition::HasClass => {
            code.line(format!("el = driver.find_element({})", locator))
                .line(r#"el_classes = el.get_attribute("class") or """#);
            (
                format!("{} in el_classes.split()", value),
                format!("Element '{}' has class '{}'", name, check.value),
            )
        }
        Condition::PropertyEquals => {
            code.line(format!("el = driver.find_element({})", locator))
                .line(format!("prop_val = el.get_attribute({})", quoted(&check.property)));
            (
                format!("str(prop_val) == {}", value),
                format!("Element '{}' property '{}' equals expected", name, check.property),
            )
        }
        Condition::UrlContains => (
            format!("{} in driver.current_url", value),
            "URL contains text".to_string(),
        ),
        Condition::UrlMatchesPattern => (
            format!("re.search({}, driver.current_url)", quoted(check.pattern())),
            "URL matches regex".to_string(),
        ),
        Condition::NetworkStatus | Condition::Unrecognized(_) => return code.finish(),
    };

    code.line("try:");
    code.line_at(1, format!("assert {}", assertion));
    if step.verbose {
        code.line_at(1, format!("log_pass({})", quoted(&message)));
    }
    code.line("except AssertionError:");
    code.line_at(1, format!("log_fail({})", quoted(&message)));
    code.line_at(1, "raise");
    code.finish()
}

pub(super) fn branch(check: &Check, ctx: &EmitContext<'_>) -> String {
    let mut code = ctx.code();
    code.line(format!(
        "log_info({})",
        quoted(&format!("Condition Check: {}...", check.condition.label()))
    ));
    let condition = guard(check, ctx, &mut code);
    code.line(format!("if {}:", condition));
    code.line_at(1, r#"log_info(">> Condition matched (TRUE)")"#);
    arm(&mut code, ctx, SourceRole::True);
    code.line("else:");
    code.line_at(1, r#"log_info(">> Condition failed (FALSE)")"#);
    arm(&mut code, ctx, SourceRole::False);
    code.finish()
}

fn arm(code: &mut Code, ctx: &EmitContext<'_>, role: SourceRole) {
    match ctx.branch_target(role) {
        Some(target) => {
            code.push(ctx.recurse(target, ctx.indent() + 1, ctx.scope()));
        }
        None => {
            code.line_at(1, "pass");
        }
    }
}

/// Writes any lookup lines the guard needs and returns the `if` expression.
///
/// Lookups never raise: a missing element simply makes the condition false.
fn guard(check: &Check, ctx: &EmitContext<'_>, code: &mut Code) -> String {
    if check.condition == Condition::NetworkStatus {
        ctx.warn(
            DiagnosticKind::Unsupported,
            "network status conditions are not supported by Selenium",
        );
        note(code, "Note: Selenium cannot inspect network responses, condition treated as true.");
        return "True".to_string();
    }
    let element = match check_target(check, ctx) {
        Ok(element) => element,
        Err(reason) => {
            note(code, &reason);
            return "True".to_string();
        }
    };
    let locator = element.as_ref().map(locate).unwrap_or_default();
    let value = as_text(ctx, &check.value);

    match &check.condition {
        Condition::Visible => {
            code.line(format!("elements = driver.find_elements({})", locator));
            "len(elements) > 0 and elements[0].is_displayed()".to_string()
        }
        Condition::ContainsText => {
            code.line("try:");
            code.line_at(1, format!("el_txt = driver.find_element({}).text", locator));
            code.line("except Exception:");
            code.line_at(1, r#"el_txt = """#);
            format!("{} in el_txt", value)
        }
        Condition::HasClass => {
            code.line("try:");
            code.line_at(
                1,
                format!(
                    r#"el_classes = (driver.find_element({}).get_attribute("class") or "").split()"#,
                    locator
                ),
            );
            code.line("except Exception:");
            code.line_at(1, "el_classes = []");
            format!("{} in el_classes", value)
        }
        Condition::PropertyEquals => {
            code.line("try:");
            code.line_at(
                1,
                format!(
                    "prop_val = driver.find_element({}).get_attribute({})",
                    locator,
                    quoted(&check.property)
                ),
            );
            code.line("except Exception:");
            code.line_at(1, "prop_val = None");
            format!("prop_val is not None and str(prop_val) == {}", value)
        }
        Condition::UrlContains => format!("{} in driver.current_url", value),
        Condition::UrlMatchesPattern => {
            format!("re.search({}, driver.current_url)", quoted(check.pattern()))
        }
        Condition::NetworkStatus | Condition::Unrecognized(_) => "True".to_string(),
    }
}

pub(super) fn repeat(step: &RepeatStep, ctx: &EmitContext<'_>) -> String {
    let mut code = ctx.code();
    let body = ctx.branch_target(SourceRole::RepeatBody);

    if let RepeatMode::Unrecognized(raw) = &step.mode {
        ctx.unrecognized("loop type", raw, "Counter");
    }
    match &step.mode {
        RepeatMode::Counter | RepeatMode::Unrecognized(_) => {
            let count = ctx.translate(&step.count);
            code.line(format!(
                "log_info({})",
                PythonSyntax.interpolation(&[
                    Piece::Text("Starting Loop ("),
                    Piece::Expr(count.clone()),
                    Piece::Text(" iterations)"),
                ])
            ));
            code.line(format!("for i in range(int({})):", count));
            code.line_at(1, r#"log_info(f"--- Loop Iteration {i + 1} ---")"#);
            if let Some(target) = body {
                code.push(ctx.recurse(target, ctx.indent() + 1, ctx.loop_body_scope()));
            }
        }
        RepeatMode::While => {
            match &step.condition {
                Condition::Visible => {}
                Condition::Unrecognized(raw) => ctx.warn(
                    DiagnosticKind::UnrecognizedValue,
                    format!("unknown loop condition '{}', polling visibility instead", raw),
                ),
                other => ctx.warn(
                    DiagnosticKind::Unsupported,
                    format!(
                        "while loops poll element visibility, '{}' is ignored",
                        other.label()
                    ),
                ),
            }
            match ctx.element() {
                Some(element) => {
                    code.line(r#"log_info("Starting While Loop")"#);
                    code.line("while True:");
                    code.line_at(1, "try:");
                    code.line_at(
                        2,
                        format!(
                            "if not driver.find_element({}).is_displayed():",
                            locate(&element)
                        ),
                    );
                    code.line_at(3, "break");
                    code.line_at(1, "except Exception:");
                    code.line_at(2, "break");
                    if let Some(target) = body {
                        code.push(ctx.recurse(target, ctx.indent() + 1, ctx.loop_body_scope()));
                    }
                }
                None => {
                    ctx.warn(
                        DiagnosticKind::MissingElement,
                        "while loop has no element connected, loop skipped",
                    );
                    note(&mut code, "Warning: While loop has no element connected, loop skipped");
                }
            }
        }
    }

    code.line(r#"log_info("Loop Finished")"#);
    if let Some(done) = ctx.branch_target(SourceRole::RepeatDone) {
        code.push(ctx.recurse(done, ctx.indent(), ctx.scope()));
    }
    code.finish()
}

pub(super) fn delay(step: &DelayStep, ctx: &EmitContext<'_>) -> String {
    let mut code = ctx.code();
    match step {
        DelayStep::Time { duration } => sleep(&mut code, duration, ctx),
        DelayStep::Unrecognized { wait_type, duration } => {
            ctx.unrecognized("wait type", wait_type, "a timed wait");
            sleep(&mut code, duration, ctx);
        }
        DelayStep::Network { alias } => {
            ctx.warn(
                DiagnosticKind::Unsupported,
                format!("waiting on '@{}' needs request interception, using a fixed sleep", alias),
            );
            note(&mut code, &format!("Wait for network request '@{}'", alias));
            note(&mut code, "Note: Selenium does not support native network wait.");
            note(&mut code, "Consider using selenium-wire or explicit waits instead.");
            code.line("time.sleep(1)  # Fallback: wait 1 second");
        }
    }
    code.finish()
}

fn sleep(code: &mut Code, duration: &str, ctx: &EmitContext<'_>) {
    let form = ValueForm::classify(duration);
    let seconds = form.render(ctx.syntax());
    match &form {
        ValueForm::Number(n) if n.parse::<f64>().is_ok_and(|v| v >= 1.0) => {
            code.line(format!(
                "log_step({})",
                quoted(&format!("Waiting for {} seconds...", n))
            ));
        }
        _ if !form.is_literal() => {
            code.line(format!(
                r#"log_step("Waiting for " + str({}) + " seconds...")"#,
                seconds
            ));
        }
        _ => {}
    }
    code.line(format!("time.sleep(float({}))", seconds));
}

pub(super) fn capture(step: &CaptureStep, ctx: &EmitContext<'_>) -> String {
    let mut code = ctx.code();
    let directory = step.directory();
    code.line("# Capture Screenshot");
    code.line(format!("os.makedirs({}, exist_ok=True)", quoted(directory)));
    let path = if step.counter {
        code.line("self.screenshot_counter += 1");
        let stem = format!("{}/{}_", directory, step.filename);
        PythonSyntax.interpolation(&[
            Piece::Text(&stem),
            Piece::Expr("self.screenshot_counter".to_string()),
            Piece::Text(".png"),
        ])
    } else {
        quoted(&format!("{}/{}.png", directory, step.filename))
    };
    code.line(format!("save_path = {}", path))
        .line("driver.save_screenshot(save_path)")
        .line(r#"log_info("Screenshot saved: " + save_path)"#);
    code.finish()
}

pub(super) fn set_variable(step: &SetVariableStep, ctx: &EmitContext<'_>) -> String {
    let mut code = ctx.code();
    code.line(format!(
        "self.vars[{}] = {}",
        quoted(&step.name),
        ctx.translate(&step.value)
    ));
    code.finish()
}

pub(super) fn network_rule(step: &NetworkRuleStep, ctx: &EmitContext<'_>) -> String {
    ctx.warn(
        DiagnosticKind::Unsupported,
        "request interception is not supported by Selenium",
    );
    let mut code = ctx.code();
    note(
        &mut code,
        &format!(
            "Network Intercept: {} {} (alias: {})",
            step.method, step.url_pattern, step.alias
        ),
    );
    note(&mut code, "Note: Selenium does not support native network interception.");
    note(&mut code, "Consider using selenium-wire or mitmproxy for request mocking.");
    if let Some(mock) = &step.mock {
        note(&mut code, &format!("Mock Response: Status {}", mock.status));
    }
    code.finish()
}

pub(super) fn load_fixture(step: &LoadFixtureStep, ctx: &EmitContext<'_>) -> String {
    let mut code = ctx.code();
    note(&mut code, &format!("Load fixture from {}", step.path));
    code.line(format!("with open({}, \"r\") as f:", ctx.translate(&step.path)));
    code.line_at(1, format!("self.vars[{}] = json.load(f)", quoted(&step.name)));
    code.line(format!(
        "log_step({})",
        quoted(&format!(
            "Loaded fixture '{}' into variable '{}'",
            step.path, step.name
        ))
    ));
    code.finish()
}

pub(super) fn custom_call(step: &CustomCallStep, ctx: &EmitContext<'_>) -> String {
    let mut code = ctx.code();
    let name = step.command.as_deref().unwrap_or("my_command");
    let arguments = step
        .arguments
        .iter()
        .map(|arg| ctx.translate(arg))
        .join(", ");
    note(&mut code, &format!("Custom command: {}", name));
    code.line(format!("{}({})", name, arguments));
    code.finish()
}
