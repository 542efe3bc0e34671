use super::*;

#[test]
fn suffix_match_prefers_longest_common_prefix() {
    let matched = find_suffix_matched_path(
        "store/storepb/types.proto",
        "vendor/acme/pkg/store/storepb/rpc.proto",
    )
    .unwrap();
    assert_eq!(matched, "vendor/acme/pkg/store/storepb/types.proto");
}

#[test]
fn suffix_match_single_segment_overlap() {
    let matched = find_suffix_matched_path(
        "store/labelpb/types.proto",
        "vendor/acme/pkg/store/storepb/rpc.proto",
    )
    .unwrap();
    assert_eq!(matched, "vendor/acme/pkg/store/labelpb/types.proto");
}

#[test]
fn suffix_match_bare_file_name_falls_back_to_sibling() {
    let matched = find_suffix_matched_path("types.proto", "pkg/store/rpc.proto").unwrap();
    assert_eq!(matched, "pkg/store/types.proto");
}

#[test]
fn suffix_match_requires_some_overlap() {
    assert!(find_suffix_matched_path("a/b/c.proto", "x/y/z.proto").is_none());
}

#[test]
fn is_local_rejects_absolute_and_escaping_paths() {
    assert!(is_local("foo/bar.proto"));
    assert!(!is_local("/etc/passwd"));
    assert!(!is_local("../up.proto"));
    assert!(!is_local("a/../b.proto"));
    assert!(!is_local(""));
}

#[test]
fn clean_join_resolves_dot_segments() {
    assert_eq!(clean_join(&["a/b", "../c", "d.proto"]), "a/c/d.proto");
    assert_eq!(clean_join(&["a", ".", "b.proto"]), "a/b.proto");
    assert_eq!(clean_join(&["/root/x", "y"]), "/root/x/y");
}

#[test]
fn relative_to_walks_up_and_down() {
    assert_eq!(relative_to("/a/b/c", "/a/b/d/e").unwrap(), "../d/e");
    assert_eq!(relative_to("/a/b", "/a/b").unwrap(), ".");
    assert_eq!(relative_to("a/b", "a/b/c.proto").unwrap(), "c.proto");
}

#[test]
fn go_package_scan_extracts_quoted_path() {
    let source = "syntax = \"proto3\";\noption go_package = \"example.com/foo/bar\";\n";
    assert_eq!(fast_lookup_go_package(source).unwrap(), "example.com/foo/bar");
}

#[test]
fn go_package_scan_strips_package_directive() {
    let source = "option go_package = \"example.com/foo/bar;barpb\";\n";
    assert_eq!(fast_lookup_go_package(source).unwrap(), "example.com/foo/bar");
}

#[test]
fn go_package_scan_ignores_other_options() {
    let source = "option java_package = \"com.example\";\nmessage Foo {}\n";
    assert!(fast_lookup_go_package(source).is_none());
}

#[test]
fn go_package_scan_skips_indented_mentions() {
    // Only lines starting with `option` are considered.
    let source = "// option go_package = \"nope\";\noption go_package = \"example.com/real\";\n";
    assert_eq!(fast_lookup_go_package(source).unwrap(), "example.com/real");
}

#[test]
fn base_and_parent_split_paths() {
    assert_eq!(base("a/b/c.proto"), "c.proto");
    assert_eq!(base("c.proto"), "c.proto");
    assert_eq!(parent("a/b/c.proto"), "a/b");
    assert_eq!(parent("c.proto"), ".");
}
