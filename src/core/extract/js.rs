//! AST extraction for the JavaScript/TypeScript family.
//!
//! Every string literal and template literal in the module is a candidate.
//! Call sites and request-config objects leave method hints keyed by the
//! literal's start position, which the literal visitors pick up.

use std::{collections::HashMap, path::Path};

use anyhow::{Result, anyhow};
use swc_common::{BytePos, FileName, GLOBALS, Globals, SourceMap, sync::Lrc};
use swc_ecma_ast::{
    CallExpr, Callee, Expr, ExprOrSpread, Lit, MemberProp, ObjectLit, Prop, PropName,
    PropOrSpread, Str, Tpl, TplElement,
};
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::{
    endpoint::HttpMethod,
    extract::{
        RawCandidate,
        method::{
            METHOD_KEY, is_fetch_like, is_url_key, method_from_call_name, parse_method_value,
        },
        to_candidate_path,
    },
};

/// Extensions handled by this extractor.
pub const JS_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"];

pub fn is_js_family(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| JS_EXTENSIONS.iter().any(|js| js.eq_ignore_ascii_case(ext)))
}

/// Plain `.ts` files are parsed without JSX so `<T>value` casts stay valid.
fn syntax_for(file_path: &str) -> Syntax {
    let ext = Path::new(file_path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let tsx = !matches!(ext.as_deref(), Some("ts" | "mts" | "cts"));

    Syntax::Typescript(TsSyntax {
        tsx,
        decorators: true,
        ..Default::default()
    })
}

pub fn extract(source: &str, file_path: &str) -> Result<Vec<RawCandidate>> {
    GLOBALS.set(&Globals::new(), || {
        let source_map: Lrc<SourceMap> = Default::default();
        let source_file = source_map
            .new_source_file(FileName::Real(file_path.into()).into(), source.to_string());

        let mut parser = Parser::new(
            syntax_for(file_path),
            StringInput::from(&*source_file),
            None,
        );
        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("failed to parse {}: {:?}", file_path, e))?;

        let mut collector = CandidateCollector::new(&source_map);
        module.visit_with(&mut collector);

        let mut candidates = collector.candidates;
        candidates.sort_by_key(|c| (c.line, c.col));
        Ok(candidates)
    })
}

struct CandidateCollector<'a> {
    source_map: &'a SourceMap,
    /// Method hints by literal start position.
    hints: HashMap<BytePos, HttpMethod>,
    candidates: Vec<RawCandidate>,
}

impl<'a> CandidateCollector<'a> {
    fn new(source_map: &'a SourceMap) -> Self {
        Self {
            source_map,
            hints: HashMap::new(),
            candidates: Vec::new(),
        }
    }

    fn hint(&mut self, expr: &Expr, method: HttpMethod) {
        if let Some(pos) = literal_start(expr) {
            self.hints.entry(pos).or_insert(method);
        }
    }

    fn record(&mut self, pos: BytePos, text: &str) {
        let Some(path) = to_candidate_path(text) else {
            return;
        };
        let loc = self.source_map.lookup_char_pos(pos);
        self.candidates.push(RawCandidate {
            line: loc.line,
            col: loc.col_display + 1,
            text: path,
            method: self.hints.get(&pos).copied(),
        });
    }
}

impl Visit for CandidateCollector<'_> {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        if let Some(url) = node.args.first().filter(|a| a.spread.is_none())
            && let Callee::Expr(callee) = &node.callee
        {
            match &**callee {
                // api.get('/users'), this.http.post(`/orders`)
                Expr::Member(member) => {
                    if let MemberProp::Ident(prop) = &member.prop
                        && let Some(method) = method_from_call_name(prop.sym.as_str())
                    {
                        self.hint(&url.expr, method);
                    }
                }
                Expr::Ident(ident) if is_fetch_like(ident.sym.as_str()) => {
                    if let Some(method) = fetch_method(node.args.get(1)) {
                        self.hint(&url.expr, method);
                    }
                }
                _ => {}
            }
        }

        node.visit_children_with(self);
    }

    fn visit_object_lit(&mut self, node: &ObjectLit) {
        // { url: '/users', method: 'post' }
        let mut url = None;
        let mut method = None;
        for prop in &node.props {
            let PropOrSpread::Prop(prop) = prop else {
                continue;
            };
            let Prop::KeyValue(kv) = &**prop else {
                continue;
            };
            match prop_name(&kv.key) {
                Some(key) if is_url_key(key) => url = Some(&kv.value),
                Some(METHOD_KEY) => method = string_value(&kv.value).and_then(parse_method_value),
                _ => {}
            }
        }
        if let (Some(url), Some(method)) = (url, method) {
            self.hint(url, method);
        }

        node.visit_children_with(self);
    }

    fn visit_str(&mut self, node: &Str) {
        if let Some(value) = node.value.as_str() {
            self.record(node.span.lo, value);
        }
    }

    fn visit_tpl(&mut self, node: &Tpl) {
        if let Some(text) = render_template(node) {
            self.record(node.span.lo, &text);
        }
        node.visit_children_with(self);
    }
}

/// Method of a `fetch(url, init?)` call.
///
/// A missing init or an init literal without `method` is a GET. Any other init
/// expression leaves the method unknown.
fn fetch_method(init: Option<&ExprOrSpread>) -> Option<HttpMethod> {
    let Some(init) = init else {
        return Some(HttpMethod::Get);
    };
    let Expr::Object(object) = &*init.expr else {
        return None;
    };

    let mut method = Some(HttpMethod::Get);
    for prop in &object.props {
        match prop {
            PropOrSpread::Spread(_) => method = None,
            PropOrSpread::Prop(prop) => {
                if let Prop::KeyValue(kv) = &**prop
                    && prop_name(&kv.key) == Some(METHOD_KEY)
                {
                    method = string_value(&kv.value).and_then(parse_method_value);
                }
            }
        }
    }
    method
}

fn literal_start(expr: &Expr) -> Option<BytePos> {
    match expr {
        Expr::Lit(Lit::Str(s)) => Some(s.span.lo),
        Expr::Tpl(tpl) => Some(tpl.span.lo),
        _ => None,
    }
}

fn prop_name(key: &PropName) -> Option<&str> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.as_str()),
        PropName::Str(s) => s.value.as_str(),
        _ => None,
    }
}

fn string_value(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Lit(Lit::Str(s)) => s.value.as_str(),
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl.quasis.first().and_then(cooked),
        _ => None,
    }
}

fn cooked(quasi: &TplElement) -> Option<&str> {
    quasi.cooked.as_ref().and_then(|c| c.as_str())
}

/// Render a template literal with each interpolation as `{}`.
///
/// A leading interpolation directly followed by `/` is a base URL and is
/// dropped: `` `${API}/users/${id}` `` renders as `/users/{}`.
fn render_template(tpl: &Tpl) -> Option<String> {
    let first = tpl.quasis.first().and_then(cooked)?;
    let drops_base = first.is_empty()
        && !tpl.exprs.is_empty()
        && tpl
            .quasis
            .get(1)
            .and_then(cooked)
            .is_some_and(|q| q.starts_with('/'));
    let start = usize::from(drops_base);

    let mut out = String::new();
    for (i, quasi) in tpl.quasis.iter().enumerate().skip(start) {
        if i > start {
            out.push_str("{}");
        }
        out.push_str(cooked(quasi)?);
    }
    Some(out)
}
