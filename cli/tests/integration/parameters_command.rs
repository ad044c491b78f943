//! Integration tests for `aws-install parameters`

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

const TEMPLATE: &str = r"
Parameters:
  StageName:
    Description: API stage
  MemorySize:
    Default: 128
Resources:
  Handler:
    Type: AWS::Lambda::Function
    Properties:
      Code: src
      Role: !GetAtt Role.Arn
";

fn aws_install() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("aws-install"));
    cmd.env("NO_COLOR", "1").env_remove("AWS_INSTALL_CONFIG");
    cmd
}

#[test]
fn test_parameters_lists_schema_from_template_flag() {
    let dir = tempfile::tempdir().expect("tempdir");
    let template = dir.path().join("template.yaml");
    std::fs::write(&template, TEMPLATE).expect("write template");

    aws_install()
        .current_dir(dir.path())
        .args(["parameters", "--template"])
        .arg(&template)
        .assert()
        .success()
        .stdout(predicate::str::contains("StageName"))
        .stdout(predicate::str::contains("required  API stage"))
        .stdout(predicate::str::contains("default: 128"));
}

#[test]
fn test_parameters_resolves_template_relative_to_config_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::create_dir_all(dir.path().join("deploy")).expect("mkdir");
    std::fs::write(dir.path().join("deploy/stack.yaml"), TEMPLATE).expect("write template");
    std::fs::write(
        dir.path().join("deploy/aws-install.yaml"),
        "stack_name: demo\ntemplate: stack.yaml\n",
    )
    .expect("write config");

    aws_install()
        .current_dir(dir.path())
        .args(["parameters", "--config", "deploy/aws-install.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MemorySize"));
}

#[test]
fn test_parameters_without_template_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    aws_install()
        .current_dir(dir.path())
        .arg("parameters")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No template given"));
}

#[test]
fn test_parameters_rejects_template_without_resources() {
    let dir = tempfile::tempdir().expect("tempdir");
    let template = dir.path().join("empty.yaml");
    std::fs::write(&template, "Parameters: {}\n").expect("write template");

    aws_install()
        .current_dir(dir.path())
        .args(["parameters", "--template"])
        .arg(&template)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Resources"));
}
