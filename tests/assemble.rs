mod common;

use common::{FakeToolchain, make_framework, read_archs, set};
use xcframework_builder::bundler::{
    Error, Platform, XcframeworkAssembler,
    xcframework::{platform_work_dir, xcframework_output_path},
};

fn assert_no_work_dirs(bundle: &std::path::Path) {
    for platform in Platform::ALL {
        let dir = platform_work_dir(bundle, platform);
        assert!(!dir.exists(), "{} survived", dir.display());
    }
}

#[test]
fn fat_framework_becomes_xcframework() {
    let tmp = tempfile::tempdir().unwrap();
    let bundle = make_framework(tmp.path(), "NIMSDK", &["armv7", "arm64", "i386", "x86_64"]);
    let tools = FakeToolchain::new();

    let output = XcframeworkAssembler::new(&tools).assemble(&bundle).unwrap();

    assert_eq!(output, tmp.path().join("NIMSDK.xcframework"));
    assert!(output.join("Info.plist").is_file());
    assert_eq!(
        read_archs(&output.join("slice-0/NIMSDK.framework/NIMSDK")),
        set(&["armv7", "arm64"])
    );
    assert_eq!(
        read_archs(&output.join("slice-1/NIMSDK.framework/NIMSDK")),
        set(&["i386", "x86_64"])
    );
    assert_no_work_dirs(&bundle);
}

#[test]
fn slices_are_passed_in_platform_order() {
    let tmp = tempfile::tempdir().unwrap();
    let bundle = make_framework(tmp.path(), "NIMSDK", &["arm64", "x86_64"]);
    let tools = FakeToolchain::new();

    XcframeworkAssembler::new(&tools).assemble(&bundle).unwrap();

    let calls = tools.assemble_calls();
    assert_eq!(calls.len(), 1);
    let device = platform_work_dir(&bundle, Platform::IphoneOs).join("NIMSDK.framework");
    let simulator =
        platform_work_dir(&bundle, Platform::IphoneSimulator).join("NIMSDK.framework");
    let output = xcframework_output_path(&bundle);
    assert_eq!(
        calls[0].args_lossy(),
        vec![
            "-create-xcframework".to_string(),
            "-framework".to_string(),
            device.display().to_string(),
            "-framework".to_string(),
            simulator.display().to_string(),
            "-output".to_string(),
            output.display().to_string(),
        ]
    );
}

#[test]
fn custom_platform_order_is_honoured() {
    let tmp = tempfile::tempdir().unwrap();
    let bundle = make_framework(tmp.path(), "NIMSDK", &["arm64", "x86_64"]);
    let tools = FakeToolchain::new();

    let assembler = XcframeworkAssembler::new(&tools)
        .with_platforms(vec![Platform::IphoneSimulator, Platform::IphoneOs]);
    assert_eq!(
        assembler.platforms(),
        &[Platform::IphoneSimulator, Platform::IphoneOs]
    );
    let output = assembler.assemble(&bundle).unwrap();

    assert_eq!(read_archs(&output.join("slice-0/NIMSDK.framework/NIMSDK")), set(&["x86_64"]));
    assert_eq!(read_archs(&output.join("slice-1/NIMSDK.framework/NIMSDK")), set(&["arm64"]));
}

#[test]
fn later_platform_failure_skips_assembly_and_cleans_everything() {
    let tmp = tempfile::tempdir().unwrap();
    let bundle = make_framework(tmp.path(), "NIMSDK", &["armv7", "arm64", "i386", "x86_64"]);
    let tools = FakeToolchain::new().fail_archs_matching("-iphonesimulator");

    let err = XcframeworkAssembler::new(&tools).assemble(&bundle).unwrap_err();

    match &err {
        Error::IncompletePlatformSet {
            platform,
            completed,
            expected,
            source,
        } => {
            assert_eq!(*platform, Platform::IphoneSimulator);
            assert_eq!(*completed, 1);
            assert_eq!(*expected, 2);
            assert!(matches!(**source, Error::ToolError { .. }));
        }
        other => panic!("expected IncompletePlatformSet, got {other}"),
    }
    assert!(tools.assemble_calls().is_empty());
    assert!(!xcframework_output_path(&bundle).exists());
    assert_no_work_dirs(&bundle);
}

#[test]
fn first_platform_failure_stops_the_loop() {
    let tmp = tempfile::tempdir().unwrap();
    let bundle = make_framework(tmp.path(), "NIMSDK", &["armv7", "i386"]);
    let tools = FakeToolchain::new().fail_archs_matching("-iphoneos");

    let err = XcframeworkAssembler::new(&tools).assemble(&bundle).unwrap_err();

    assert!(matches!(
        err,
        Error::IncompletePlatformSet {
            platform: Platform::IphoneOs,
            completed: 0,
            ..
        }
    ));
    // The simulator was never attempted
    assert_eq!(tools.lipo_archs_calls(), 1);
    assert!(tools.assemble_calls().is_empty());
    assert_no_work_dirs(&bundle);
}

#[test]
fn assembly_tool_failure_still_removes_slices() {
    let tmp = tempfile::tempdir().unwrap();
    let bundle = make_framework(tmp.path(), "NIMSDK", &["arm64", "x86_64"]);
    let tools = FakeToolchain::new().fail_assemble();

    let err = XcframeworkAssembler::new(&tools).assemble(&bundle).unwrap_err();

    assert!(matches!(err, Error::AssemblyToolError { code: Some(70), .. }), "{err}");
    assert_eq!(tools.assemble_calls().len(), 1);
    assert_no_work_dirs(&bundle);
}

#[test]
fn directory_without_info_plist_is_rejected_up_front() {
    let tmp = tempfile::tempdir().unwrap();
    let bundle = make_framework(tmp.path(), "NIMSDK", &["arm64"]);
    std::fs::remove_file(bundle.join("Info.plist")).unwrap();
    let tools = FakeToolchain::new();

    let err = XcframeworkAssembler::new(&tools).assemble(&bundle).unwrap_err();

    assert!(matches!(err, Error::InvalidBundle { .. }));
    assert!(tools.calls().is_empty());
    assert_no_work_dirs(&bundle);
}

#[test]
fn stale_output_is_replaced() {
    let tmp = tempfile::tempdir().unwrap();
    let bundle = make_framework(tmp.path(), "NIMSDK", &["arm64", "x86_64"]);
    let stale = xcframework_output_path(&bundle);
    std::fs::create_dir_all(stale.join("old-slice")).unwrap();
    let tools = FakeToolchain::new();

    let output = XcframeworkAssembler::new(&tools).assemble(&bundle).unwrap();

    assert!(!output.join("old-slice").exists());
    assert!(output.join("slice-0").is_dir());
}

#[test]
fn assembling_twice_gives_the_same_slices() {
    let tmp = tempfile::tempdir().unwrap();
    let bundle = make_framework(tmp.path(), "NIMSDK", &["armv7", "arm64", "i386", "x86_64"]);
    let tools = FakeToolchain::new();
    let assembler = XcframeworkAssembler::new(&tools);

    let first = assembler.assemble(&bundle).unwrap();
    let first_device = read_archs(&first.join("slice-0/NIMSDK.framework/NIMSDK"));
    let second = assembler.assemble(&bundle).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        read_archs(&second.join("slice-0/NIMSDK.framework/NIMSDK")),
        first_device
    );
    assert_no_work_dirs(&bundle);
}

#[test]
fn trailing_separator_on_bundle_path_is_accepted() {
    let tmp = tempfile::tempdir().unwrap();
    let bundle = make_framework(tmp.path(), "NIMSDK", &["arm64", "x86_64"]);
    let tools = FakeToolchain::new();

    let output = XcframeworkAssembler::new(&tools)
        .assemble(&tmp.path().join("NIMSDK.framework/"))
        .unwrap();

    assert_eq!(output, tmp.path().join("NIMSDK.xcframework"));
    assert_eq!(
        read_archs(&output.join("slice-1/NIMSDK.framework/NIMSDK")),
        set(&["x86_64"])
    );
    assert_no_work_dirs(&bundle);
    assert_eq!(
        std::fs::read_dir(&bundle).unwrap().count(),
        3,
        "bundle gained entries"
    );
}
