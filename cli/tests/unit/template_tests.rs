//! Template handling through the public API: parameter resolution and the
//! code rewrite performed during packaging.

#![allow(clippy::expect_used)]

use std::collections::BTreeMap;

use aws_install::domain::template::resolve_parameters;
use aws_install::domain::{Template, TemplateError};

const TEMPLATE: &str = r"
AWSTemplateFormatVersion: '2010-09-09'
Parameters:
  StageName:
    Description: API stage
  LogLevel:
    Default: info
Resources:
  Api:
    Type: AWS::Lambda::Function
    Properties:
      Code: functions/api
      Role: !GetAtt Role.Arn
      Environment:
        Variables:
          STAGE: !Ref StageName
  Role:
    Type: AWS::IAM::Role
    Properties:
      AssumeRolePolicyDocument: {}
";

fn supplied(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[test]
fn test_parameters_follow_declaration_order_with_defaults() {
    let template = Template::parse(TEMPLATE).expect("parse");
    let resolved =
        resolve_parameters(&template.parameters(), &supplied(&[("StageName", "prod")]))
            .expect("resolve");
    assert_eq!(
        resolved,
        vec![
            ("StageName".to_string(), "prod".to_string()),
            ("LogLevel".to_string(), "info".to_string()),
        ]
    );
}

#[test]
fn test_supplied_value_overrides_default() {
    let template = Template::parse(TEMPLATE).expect("parse");
    let resolved = resolve_parameters(
        &template.parameters(),
        &supplied(&[("StageName", "dev"), ("LogLevel", "debug")]),
    )
    .expect("resolve");
    assert_eq!(resolved[1].1, "debug");
}

#[test]
fn test_unknown_parameter_lists_valid_names() {
    let template = Template::parse(TEMPLATE).expect("parse");
    let err = resolve_parameters(
        &template.parameters(),
        &supplied(&[("StageName", "dev"), ("Stage", "x")]),
    )
    .expect_err("unknown key");
    match err {
        TemplateError::UnknownParameter { key, valid } => {
            assert_eq!(key, "Stage");
            assert_eq!(valid, "StageName, LogLevel");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_rewrite_keeps_intrinsic_tags_and_other_resources() {
    let mut template = Template::parse(TEMPLATE).expect("parse");
    let refs = template.code_references();
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].resource, "Api");
    assert_eq!(refs[0].path, "functions/api");

    assert!(template.set_code_location("Api", "assets", "functions/api.zip"));
    let body = template.render().expect("render");

    assert!(body.contains("!GetAtt"));
    assert!(body.contains("!Ref"));
    assert!(body.contains("S3Bucket: assets"));
    assert!(body.contains("AWS::IAM::Role"));
    let again = Template::parse(&body).expect("reparse");
    assert!(again.code_references().is_empty());
}
