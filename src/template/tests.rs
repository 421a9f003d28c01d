//! End-to-end expansion tests.

use super::*;
use crate::facts::{Annotations, NodeDescription, NodePlatform, Task};
use std::collections::BTreeMap;

fn sample_ctx() -> Context {
    let mut ctx = Context::default();
    ctx.service.id = "svc9".to_string();
    ctx.service.name = "web".to_string();
    ctx.service.labels = BTreeMap::from([
        ("tier".to_string(), "backend".to_string()),
        ("team".to_string(), "infra".to_string()),
    ]);
    ctx.node.id = "node-abc".to_string();
    ctx.node.hostname = "node-7".to_string();
    ctx.node.platform = Platform {
        architecture: "x86_64".to_string(),
        os: "linux".to_string(),
    };
    ctx.task.id = "t1a2b3".to_string();
    ctx.task.name = "web.3.t1a2b3".to_string();
    ctx.task.slot = "3".to_string();
    ctx
}

#[test]
fn test_end_to_end_substitution() {
    let out = sample_ctx()
        .expand("svc={{.Service.Name}} host={{.Node.Hostname}} slot={{.Task.Slot}}")
        .unwrap();
    assert_eq!(out, "svc=web host=node-7 slot=3");
}

#[test]
fn test_label_lookup_with_index() {
    let out = sample_ctx()
        .expand(r#"{{index .Service.Labels "tier"}}"#)
        .unwrap();
    assert_eq!(out, "backend");
}

#[test]
fn test_index_missing_label_is_empty() {
    let out = sample_ctx()
        .expand(r#"[{{index .Service.Labels "missing"}}]"#)
        .unwrap();
    assert_eq!(out, "[]");
}

#[test]
fn test_label_lookup_by_field() {
    let out = sample_ctx().expand("{{.Service.Labels.team}}").unwrap();
    assert_eq!(out, "infra");
}

#[test]
fn test_missing_label_by_field_fails() {
    let err = sample_ctx()
        .expand("{{.Service.Labels.missing}}")
        .unwrap_err();
    assert!(err.is_execution());
    assert_eq!(err.original(), "{{.Service.Labels.missing}}");
}

#[test]
fn test_plain_strings_pass_through() {
    let ctx = sample_ctx();
    for s in [
        "",
        "plain",
        "/var/lib/data",
        "KEY=VALUE",
        "single { brace } pairs",
        "closing }} only",
        "unicode 日本語 🎉",
    ] {
        assert_eq!(ctx.expand(s).unwrap(), s);
    }
}

#[test]
fn test_parse_failure_returns_original() {
    let err = sample_ctx().expand("{{invalid").unwrap_err();

    assert!(err.is_parse());
    assert_eq!(err.original(), "{{invalid");
    assert!(matches!(
        err.error(),
        TemplateError::Parse(ParseError::UnclosedAction { position: 0 })
    ));
}

#[test]
fn test_nonexistent_field_returns_original() {
    let err = sample_ctx()
        .expand("prefix-{{.Task.Labels}}-suffix")
        .unwrap_err();

    assert!(err.is_execution());
    assert_eq!(err.original(), "prefix-{{.Task.Labels}}-suffix");
}

#[test]
fn test_no_partial_output_after_earlier_actions() {
    let input = "{{.Service.Name}} then {{.Node.Labels}}";
    let err = sample_ctx().expand(input).unwrap_err();
    assert_eq!(err.into_original(), input);
}

#[test]
fn test_unknown_top_level_field() {
    let err = sample_ctx().expand("{{.Secrets}}").unwrap_err();
    assert!(matches!(
        err.error(),
        TemplateError::Execution(ExecError::UnknownField { type_name: "Context", .. })
    ));
}

#[test]
fn test_expansion_is_idempotent() {
    let ctx = sample_ctx();
    let input = "{{.Task.Name}}@{{.Node.Hostname}}";
    let first = ctx.expand(input);
    let second = ctx.expand(input);
    assert_eq!(first, second);
    assert_eq!(first.unwrap(), "web.3.t1a2b3@node-7");
}

#[test]
fn test_platform_fields() {
    let out = sample_ctx()
        .expand("{{.Node.Platform.OS}}/{{.Node.Platform.Architecture}}")
        .unwrap();
    assert_eq!(out, "linux/x86_64");

    let whole = sample_ctx().expand("{{.Node.Platform}}").unwrap();
    assert_eq!(whole, "{x86_64 linux}");
}

#[test]
fn test_join_function() {
    let out = sample_ctx()
        .expand(r#"{{join "-" .Service.Name .Task.Slot .Node.Hostname}}"#)
        .unwrap();
    assert_eq!(out, "web-3-node-7");
}

#[test]
fn test_pipelines_and_printf() {
    let ctx = sample_ctx();
    assert_eq!(
        ctx.expand(r#"{{.Task.Slot | printf "replica-%s"}}"#).unwrap(),
        "replica-3"
    );
    assert_eq!(
        ctx.expand(r#"{{printf "%s.%s" .Service.Name .Node.ID}}"#)
            .unwrap(),
        "web.node-abc"
    );
    assert_eq!(ctx.expand("{{len .Service.Labels}}").unwrap(), "2");
}

#[test]
fn test_parenthesized_arguments() {
    let out = sample_ctx()
        .expand(r#"{{printf "%s-%s" (index .Service.Labels "tier") .Task.Slot}}"#)
        .unwrap();
    assert_eq!(out, "backend-3");
}

#[test]
fn test_argument_to_field_is_error() {
    let err = sample_ctx()
        .expand(r#"{{.Service.Name "x"}}"#)
        .unwrap_err();
    assert!(matches!(
        err.error(),
        TemplateError::Execution(ExecError::NotAFunction { .. })
    ));

    let err = sample_ctx()
        .expand("{{.Service.Name | .Task.ID}}")
        .unwrap_err();
    assert!(err.is_execution());
}

#[test]
fn test_trim_and_comments() {
    let out = sample_ctx()
        .expand("host:  {{- .Node.Hostname -}}  ;{{/* ignored */}}end")
        .unwrap();
    assert_eq!(out, "host:node-7;end");
}

#[test]
fn test_control_flow_is_a_parse_error() {
    let input = "{{if .Node.Hostname}}yes{{end}}";
    let err = sample_ctx().expand(input).unwrap_err();
    assert!(err.is_parse());
    assert_eq!(err.original(), input);
}

#[test]
fn test_template_reuse_across_contexts() {
    let template = Template::parse("{{.Task.Slot}}").unwrap();
    assert!(template.has_actions());

    let mut other = sample_ctx();
    other.task.slot = "7".to_string();

    assert_eq!(template.execute(&sample_ctx()).unwrap(), "3");
    assert_eq!(template.execute(&other).unwrap(), "7");
}

#[test]
fn test_text_only_template_has_no_actions() {
    assert!(!Template::parse("no actions").unwrap().has_actions());
    assert!(!Template::parse("{{/* c */}}").unwrap().has_actions());
}

#[test]
fn test_free_function_matches_method() {
    let ctx = sample_ctx();
    assert_eq!(
        expand(&ctx, "{{.Service.ID}}").unwrap(),
        ctx.expand("{{.Service.ID}}").unwrap()
    );
}

#[test]
fn test_built_context_global_task() {
    let task = Task {
        id: "t9".to_string(),
        service_id: "svc1".to_string(),
        node_id: "node-xyz".to_string(),
        slot: 0,
        annotations: Annotations::default(),
        service_annotations: Annotations {
            name: "agent".to_string(),
            labels: BTreeMap::new(),
        },
    };
    let node = NodeDescription {
        hostname: "worker-1".to_string(),
        platform: NodePlatform {
            architecture: "aarch64".to_string(),
            os: "linux".to_string(),
        },
    };

    let ctx = Context::build(Some(&node), &task);
    let out = ctx
        .expand("{{.Task.Name}} on {{.Node.Hostname}} ({{.Task.Slot}})")
        .unwrap();
    assert_eq!(out, "agent.node-xyz.t9 on worker-1 (node-xyz)");
}

#[test]
fn test_built_context_without_node_renders_empty_hostname() {
    let task = Task {
        id: "t1".to_string(),
        node_id: "node-abc".to_string(),
        slot: 2,
        ..Default::default()
    };

    let ctx = Context::build(None, &task);
    assert_eq!(ctx.expand("[{{.Node.Hostname}}]").unwrap(), "[]");
    assert_eq!(ctx.expand("{{.Node.Platform}}").unwrap(), "{ }");
}

#[test]
fn test_concurrent_expansion_shares_context() {
    let ctx = std::sync::Arc::new(sample_ctx());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let ctx = std::sync::Arc::clone(&ctx);
            std::thread::spawn(move || ctx.expand("{{.Service.Name}}:{{.Task.Slot}}"))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), "web:3");
    }
}

#[test]
fn test_deeply_nested_parens_return_parse_error() {
    let ctx = sample_ctx();

    let nested = |n: usize| format!("{{{{{}1{}}}}}", "(".repeat(n), ")".repeat(n));
    assert_eq!(ctx.expand(&nested(50)).unwrap(), "1");

    let src = nested(10_000);
    let err = ctx.expand(&src).unwrap_err();
    assert!(err.is_parse());
    assert!(matches!(
        err.error(),
        TemplateError::Parse(ParseError::MaxDepth { .. })
    ));
    assert_eq!(err.original(), src);
}

#[test]
fn test_printf_width_flags() {
    let ctx = sample_ctx();
    assert_eq!(
        ctx.expand(r#"[{{printf "%5s" .Service.Name}}]"#).unwrap(),
        "[  web]"
    );
    assert_eq!(ctx.expand(r#"{{printf "%03d" 7}}"#).unwrap(), "007");

    let err = ctx.expand(r#"{{printf "%x" 31}}"#).unwrap_err();
    assert!(err.is_execution());
    assert_eq!(err.original(), r#"{{printf "%x" 31}}"#);
}
