use super::syntax::JsSyntax;
use crate::backend::{check_target, one_line, quoted, snake};
use crate::compiler::{Code, DiagnosticKind, EmitContext};
use crate::expression::{Piece, ValueForm, ValueSyntax};
use crate::graph::{
    Action, AssertStep, CaptureStep, Check, Condition, CustomCallStep, DelayStep, ElementStep,
    EntryStep, InteractStep, LoadFixtureStep, NetworkRuleStep, RepeatMode, RepeatStep,
    SetVariableStep, SourceRole,
};
use crate::selector::{LocatorKind, Selector, SelectorValue};
use itertools::Itertools;

/// CSS selector expression for the kinds jQuery and `cy.get` understand.
fn css(selector: &Selector) -> Option<String> {
    match selector.kind {
        LocatorKind::Id => Some(match &selector.value {
            SelectorValue::Literal(text) => quoted(&format!("#{}", text.trim_start_matches('#'))),
            reference => reference.render_wrapped(&JsSyntax, "#", ""),
        }),
        LocatorKind::Css => Some(selector.value.render(&JsSyntax)),
        LocatorKind::Name => Some(selector.value.render_wrapped(&JsSyntax, "[name='", "']")),
        LocatorKind::XPath | LocatorKind::LinkText => None,
    }
}

/// The Cypress command yielding the element, the base of every chained action.
///
/// XPath goes through `cy.xpath` from the cypress-xpath plugin and link text through
/// `cy.contains`, so their chains do not start at `cy.get`.
pub(super) fn query(element: &ElementStep) -> String {
    let selector = Selector::of(element);
    if let Some(css) = css(&selector) {
        return format!("cy.get({})", css);
    }
    let value = selector.value.render(&JsSyntax);
    match selector.kind {
        LocatorKind::LinkText => format!("cy.contains(\"a\", {})", value),
        _ => format!("cy.xpath({})", value),
    }
}

/// A synchronous jQuery lookup, valid where `$body` is in scope. Never throws on a miss.
fn lookup(element: &ElementStep) -> String {
    let selector = Selector::of(element);
    if let Some(css) = css(&selector) {
        return format!("$body.find({})", css);
    }
    let value = selector.value.render(&JsSyntax);
    match selector.kind {
        LocatorKind::LinkText => format!(
            "$body.find(\"a\").filter((_, a) => Cypress.$(a).text().includes({}))",
            value
        ),
        _ => format!(
            "Cypress.$($body[0].ownerDocument.evaluate({}, $body[0].ownerDocument, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue)",
            value
        ),
    }
}

/// The translated value, coerced with `String(...)` unless it already is a string.
fn as_text(ctx: &EmitContext<'_>, raw: &str) -> String {
    let form = ValueForm::classify(raw);
    let rendered = form.render(ctx.syntax());
    if form.is_string() {
        rendered
    } else {
        format!("String({})", rendered)
    }
}

fn note(code: &mut Code, text: &str) {
    code.line(format!("// {}", one_line(text)));
}

fn log(code: &mut Code, text: &str) {
    code.line(format!("cy.log({});", quoted(text)));
}

/// `head.then((param) => { checked(message, verbose, () => expectation); });`
fn checked(code: &mut Code, head: &str, param: &str, message: &str, verbose: bool, expectation: &str) {
    code.line(format!("{}.then(({}) => {{", head, param));
    code.line_at(
        1,
        format!("checked({}, {}, () => {});", quoted(message), verbose, expectation),
    );
    code.line("});");
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

    log(&mut code, &format!("Browser: {}, URL: {}", entry.browser, entry.url));
    if entry.clear_cookies {
        code.line("cy.clearCookies();");
    }
    if entry.clear_local_storage {
        code.line("cy.clearLocalStorage();");
    }
    code.line(format!("cy.visit({});", ctx.translate(&entry.url)));
    if entry.clear_session_storage {
        code.line("cy.window().then((win) => {");
        code.line_at(1, "win.sessionStorage.clear();");
        code.line("});");
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
        log(&mut code, "Warning: Interact step has no element connected");
        return code.finish();
    };

    let base = query(&element);
    log(
        &mut code,
        &format!("Action: {} on '{}'", step.action.label(), element.name),
    );
    match &step.action {
        Action::Click => {
            code.line(format!("{}.click();", base));
        }
        Action::Type => {
            code.line(format!("{}.type({});", base, as_text(ctx, &step.value)));
        }
        Action::Clear => {
            code.line(format!("{}.clear();", base));
        }
        Action::Hover => {
            code.line(format!("{}.trigger(\"mouseover\");", base));
        }
        Action::CaptureText => match &step.save_to {
            Some(var) => {
                code.line(format!("{}.invoke(\"text\").then((text) => {{", base));
                code.line_at(1, format!("Cypress.env({}, text);", quoted(var)));
                code.line("});");
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
            log(&mut code, &format!("Unknown action '{}'", raw));
        }
    }
    code.finish()
}

pub(super) fn assert(step: &AssertStep, ctx: &EmitContext<'_>) -> String {
    let check = &step.check;
    let mut code = ctx.code();
    let element = match check_target(check, ctx) {
        Ok(element) => element,
        Err(reason) => {
            note(&mut code, &reason);
            return code.finish();
        }
    };
    let name = element.as_ref().map(|e| e.name.clone()).unwrap_or_default();
    let base = element.as_ref().map(query).unwrap_or_default();
    let value = as_text(ctx, &check.value);

    log(&mut code, &format!("Asserting: {}", check.condition.label()));
    let (head, param, expectation, message) = match &check.condition {
        Condition::Visible => (
            base,
            "$el",
            "expect($el).to.be.visible".to_string(),
            format!("Element '{}' is visible", name),
        ),
        Condition::ContainsText => (
            base,
            "$el",
            format!("expect($el.text()).to.include({})", value),
            format!("Element '{}' contains text", name),
        ),
        Condition::HasClass => (
            base,
            "$el",
            format!("expect($el).to.have.class({})", value),
            format!("Element '{}' has class '{}'", name, check.value),
        ),
        Condition::PropertyEquals => (
            base,
            "$el",
            format!(
                "expect(String($el.prop({}))).to.equal({})",
                quoted(&check.property),
                value
            ),
            format!("Element '{}' property '{}' equals expected", name, check.property),
        ),
        Condition::UrlContains => (
            "cy.url()".to_string(),
            "url",
            format!("expect(url).to.include({})", value),
            "URL contains text".to_string(),
        ),
        Condition::UrlMatchesPattern => (
            "cy.url()".to_string(),
            "url",
            format!("expect(url).to.match(new RegExp({}))", quoted(check.pattern())),
            "URL matches regex".to_string(),
        ),
        Condition::NetworkStatus => (
            format!("cy.wait({})", quoted(&format!("@{}", check.network_alias))),
            "interception",
            format!(
                "expect(interception.response.statusCode).to.equal(Number({}))",
                ctx.translate(&check.expected_status)
            ),
            format!(
                "Request '@{}' answered with status {}",
                check.network_alias, check.expected_status
            ),
        ),
        Condition::Unrecognized(_) => return code.finish(),
    };
    checked(&mut code, &head, param, &message, step.verbose, &expectation);
    code.finish()
}

pub(super) fn branch(check: &Check, ctx: &EmitContext<'_>) -> String {
    let mut code = ctx.code();
    note(&mut code, &format!("Condition Check: {}", check.condition.label()));
    let subject = branch_subject(check, ctx, &mut code);
    code.line(format!("{}.then((matched) => {{", subject));
    code.line_at(1, "if (matched) {");
    arm(&mut code, ctx, SourceRole::True);
    code.line_at(1, "} else {");
    arm(&mut code, ctx, SourceRole::False);
    code.line_at(1, "}");
    code.line("});");
    code.finish()
}

fn arm(code: &mut Code, ctx: &EmitContext<'_>, role: SourceRole) {
    match ctx.branch_target(role) {
        Some(target) => {
            code.push(ctx.recurse(target, ctx.indent() + 2, ctx.scope()));
        }
        None => {
            code.line_at(2, "return;");
        }
    }
}

/// A Cypress chain yielding whether the condition holds, without failing the test.
fn branch_subject(check: &Check, ctx: &EmitContext<'_>, code: &mut Code) -> String {
    let element = match check_target(check, ctx) {
        Ok(element) => element,
        Err(reason) => {
            note(code, &reason);
            return "cy.wrap(true)".to_string();
        }
    };
    let value = as_text(ctx, &check.value);
    let inspect = |test: String| -> String {
        let found = element.as_ref().map(lookup).unwrap_or_default();
        format!(
            "cy.get(\"body\").then(($body) => {{\n    const $el = {};\n    return {};\n}})",
            found, test
        )
    };

    match &check.condition {
        Condition::Visible => inspect("$el.length > 0 && $el.is(\":visible\")".to_string()),
        Condition::ContainsText => {
            inspect(format!("$el.length > 0 && $el.text().includes({})", value))
        }
        Condition::HasClass => inspect(format!("$el.hasClass({})", value)),
        Condition::PropertyEquals => inspect(format!(
            "$el.length > 0 && String($el.prop({})) === {}",
            quoted(&check.property),
            value
        )),
        Condition::UrlContains => format!("cy.url().then((url) => url.includes({}))", value),
        Condition::UrlMatchesPattern => format!(
            "cy.url().then((url) => new RegExp({}).test(url))",
            quoted(check.pattern())
        ),
        Condition::NetworkStatus => format!(
            "cy.wait({}).then((interception) => interception.response !== undefined && interception.response.statusCode === Number({}))",
            quoted(&format!("@{}", check.network_alias)),
            ctx.translate(&check.expected_status)
        ),
        Condition::Unrecognized(_) => "cy.wrap(true)".to_string(),
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
                "cy.log({});",
                JsSyntax.interpolation(&[
                    Piece::Text("Starting Loop ("),
                    Piece::Expr(count.clone()),
                    Piece::Text(" iterations)"),
                ])
            ));
            code.line(format!("Cypress._.times(Number({}), (i) => {{", count));
            code.line_at(1, "cy.log(`--- Loop Iteration ${i + 1} ---`);");
            if let Some(target) = body {
                code.push(ctx.recurse(target, ctx.indent() + 1, ctx.loop_body_scope()));
            }
            code.line("});");
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
                    let poll = poll_name(&ctx.node().id);
                    log(&mut code, "Starting While Loop");
                    code.line(format!("const {} = () => {{", poll));
                    code.line_at(1, "cy.get(\"body\").then(($body) => {");
                    code.line_at(2, "let visible = false;");
                    code.line_at(2, "try {");
                    code.line_at(3, format!("const $el = {};", lookup(&element)));
                    code.line_at(3, "visible = $el.length > 0 && $el.is(\":visible\");");
                    code.line_at(2, "} catch (error) {");
                    code.line_at(3, "visible = false;");
                    code.line_at(2, "}");
                    code.line_at(2, "if (!visible) {");
                    code.line_at(3, "return;");
                    code.line_at(2, "}");
                    if let Some(target) = body {
                        code.push(ctx.recurse(target, ctx.indent() + 2, ctx.loop_body_scope()));
                    }
                    code.line_at(2, format!("{}();", poll));
                    code.line_at(1, "});");
                    code.line("};");
                    code.line(format!("{}();", poll));
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

    log(&mut code, "Loop Finished");
    if let Some(done) = ctx.branch_target(SourceRole::RepeatDone) {
        code.push(ctx.recurse(done, ctx.indent(), ctx.scope()));
    }
    code.finish()
}

fn poll_name(node_id: &str) -> String {
    let suffix = snake(node_id);
    if suffix.is_empty() {
        "repeatWhile".to_string()
    } else {
        format!("repeatWhile_{}", suffix)
    }
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
            code.line(format!("cy.wait({});", quoted(&format!("@{}", alias))));
        }
    }
    code.finish()
}

fn sleep(code: &mut Code, duration: &str, ctx: &EmitContext<'_>) {
    let form = ValueForm::classify(duration);
    let seconds = form.render(ctx.syntax());
    match form {
        ValueForm::Number(_) => code.line(format!("cy.wait({} * 1000);", seconds)),
        _ => code.line(format!("cy.wait(Number({}) * 1000);", seconds)),
    };
}

pub(super) fn capture(step: &CaptureStep, ctx: &EmitContext<'_>) -> String {
    let mut code = ctx.code();
    let directory = step.directory().trim_start_matches("./");
    let stem = match directory {
        "" | "." => step.filename.clone(),
        dir => format!("{}/{}", dir, step.filename),
    };
    if step.counter {
        let prefix = format!("{}_", stem);
        code.line("screenshotCounter += 1;");
        code.line(format!(
            "cy.screenshot({});",
            JsSyntax.interpolation(&[
                Piece::Text(&prefix),
                Piece::Expr("screenshotCounter".to_string()),
            ])
        ));
    } else {
        code.line(format!("cy.screenshot({});", quoted(&stem)));
    }
    code.finish()
}

pub(super) fn set_variable(step: &SetVariableStep, ctx: &EmitContext<'_>) -> String {
    let mut code = ctx.code();
    code.line("cy.then(() => {");
    code.line_at(
        1,
        format!(
            "Cypress.env({}, {});",
            quoted(&step.name),
            ctx.translate(&step.value)
        ),
    );
    code.line("});");
    code.finish()
}

pub(super) fn network_rule(step: &NetworkRuleStep, ctx: &EmitContext<'_>) -> String {
    let mut code = ctx.code();
    let method = quoted(&step.method);
    let pattern = quoted(&step.url_pattern);
    let alias = quoted(&step.alias);
    match &step.mock {
        Some(mock) => {
            code.line(format!("cy.intercept({}, {}, {{", method, pattern));
            code.line_at(1, format!("statusCode: Number({}),", ctx.translate(&mock.status)));
            code.line_at(1, format!("body: {},", mock.json_body()));
            code.line(format!("}}).as({});", alias));
        }
        None => {
            code.line(format!("cy.intercept({}, {}).as({});", method, pattern, alias));
        }
    }
    code.finish()
}

pub(super) fn load_fixture(step: &LoadFixtureStep, ctx: &EmitContext<'_>) -> String {
    let mut code = ctx.code();
    code.line(format!(
        "cy.fixture({}).then((data) => {{",
        ctx.translate(&step.path)
    ));
    code.line_at(1, format!("Cypress.env({}, data);", quoted(&step.name)));
    code.line("});");
    log(
        &mut code,
        &format!("Loaded fixture '{}' into variable '{}'", step.path, step.name),
    );
    code.finish()
}

pub(super) fn custom_call(step: &CustomCallStep, ctx: &EmitContext<'_>) -> String {
    let mut code = ctx.code();
    let name = step.command.as_deref().unwrap_or("myCommand");
    let arguments = step
        .arguments
        .iter()
        .map(|arg| ctx.translate(arg))
        .join(", ");
    code.line(format!("cy.{}({});", name, arguments));
    code.finish()
}
