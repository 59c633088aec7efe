//! Build script - stages the linker script for cortex-m-rt, compiles the
//! HID transfer glue and links the C USB host stack when the board build
//! provides it.

use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    // Copy memory.x to OUT_DIR
    fs::copy("memory.x", out_dir.join("memory.x")).expect("memory.x is readable");
    println!("cargo:rustc-link-search={}", out_dir.display());

    // HID interrupt-IN glue, compiled against the CherryUSB headers.
    if let Ok(include) = env::var("CHERRYUSB_INCLUDE_DIR") {
        let mut build = cc::Build::new();
        build.file("csrc/usbh_hid_port.c");
        for dir in env::split_paths(&include) {
            build.include(dir);
        }
        build.compile("usbh_hid_port");
    }

    // CherryUSB host stack plus its board port, built as a static library.
    if let Ok(dir) = env::var("CHERRYUSB_LIB_DIR") {
        println!("cargo:rustc-link-search=native={dir}");
        println!("cargo:rustc-link-lib=static=cherryusb");
    }

    println!("cargo:rerun-if-env-changed=CHERRYUSB_INCLUDE_DIR");
    println!("cargo:rerun-if-env-changed=CHERRYUSB_LIB_DIR");
    println!("cargo:rerun-if-changed=csrc/usbh_hid_port.c");
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}
