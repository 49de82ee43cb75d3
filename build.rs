/// build.rs — console-attach build script.
///
/// On Windows targets: embeds a VERSIONINFO resource into the compiled
/// executable so Explorer and Task Manager show a proper description for the
/// GUI-subsystem binary.
///
/// Uses CARGO_CFG_TARGET_OS rather than cfg!(target_os) so that cross-
/// compilation scenarios are handled correctly.
///
/// On non-Windows targets this script is a no-op.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os == "windows" {
        let mut res = winres::WindowsResource::new();
        res.set("FileDescription", "console-attach")
            .set("ProductName", "console-attach")
            .set("OriginalFilename", "console-attach.exe");
        res.compile()
            .expect("Failed to compile Windows resources (winres). \
                     Ensure a C compiler (MSVC or MinGW) is available.");
    }
}
