//! Platform types, native target triples and host-supported target lists.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The platform a target compiles for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlatformType {
    /// Shared code compiled to platform-independent metadata
    Common,
    Jvm,
    Js,
    /// Android flavour of the JVM
    AndroidJvm,
    Native,
}

impl PlatformType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformType::Common => "common",
            PlatformType::Jvm => "jvm",
            PlatformType::Js => "js",
            PlatformType::AndroidJvm => "androidJvm",
            PlatformType::Native => "native",
        }
    }
}

impl fmt::Display for PlatformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "common" => Ok(PlatformType::Common),
            "jvm" => Ok(PlatformType::Jvm),
            "js" => Ok(PlatformType::Js),
            "androidJvm" => Ok(PlatformType::AndroidJvm),
            "native" => Ok(PlatformType::Native),
            _ => Err(format!("unknown platform type: {}", s)),
        }
    }
}

/// A native compilation target triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NativeTarget {
    /// Triple-like identifier, e.g. `linux_x64`
    pub name: &'static str,
    /// Name of the preset that creates targets for this triple
    pub preset_name: &'static str,
}

impl NativeTarget {
    const fn new(name: &'static str, preset_name: &'static str) -> Self {
        NativeTarget { name, preset_name }
    }

    pub const ANDROID_ARM32: NativeTarget = NativeTarget::new("android_arm32", "androidNativeArm32");
    pub const ANDROID_ARM64: NativeTarget = NativeTarget::new("android_arm64", "androidNativeArm64");
    pub const IOS_ARM32: NativeTarget = NativeTarget::new("ios_arm32", "iosArm32");
    pub const IOS_ARM64: NativeTarget = NativeTarget::new("ios_arm64", "iosArm64");
    pub const IOS_X64: NativeTarget = NativeTarget::new("ios_x64", "iosX64");
    pub const LINUX_X64: NativeTarget = NativeTarget::new("linux_x64", "linuxX64");
    pub const LINUX_ARM32_HFP: NativeTarget = NativeTarget::new("linux_arm32_hfp", "linuxArm32Hfp");
    pub const LINUX_MIPS32: NativeTarget = NativeTarget::new("linux_mips32", "linuxMips32");
    pub const LINUX_MIPSEL32: NativeTarget = NativeTarget::new("linux_mipsel32", "linuxMipsel32");
    pub const MACOS_X64: NativeTarget = NativeTarget::new("macos_x64", "macosX64");
    pub const MINGW_X64: NativeTarget = NativeTarget::new("mingw_x64", "mingwX64");
    pub const WASM32: NativeTarget = NativeTarget::new("wasm32", "wasm32");
}

impl fmt::Display for NativeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Operating system of the machine running the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostOs {
    Linux,
    Macos,
    Windows,
}

impl HostOs {
    /// Detect the current host. Unknown systems are treated as Linux.
    pub fn current() -> Self {
        match std::env::consts::OS {
            "macos" => HostOs::Macos,
            "windows" => HostOs::Windows,
            _ => HostOs::Linux,
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostOs::Linux => write!(f, "linux"),
            HostOs::Macos => write!(f, "macos"),
            HostOs::Windows => write!(f, "windows"),
        }
    }
}

/// Knows which native targets a host can build.
///
/// The enumeration order differs between hosts; nothing in the model may
/// depend on it for correctness.
#[derive(Debug, Clone, Copy)]
pub struct HostManager {
    host: HostOs,
}

impl HostManager {
    pub fn new(host: HostOs) -> Self {
        HostManager { host }
    }

    pub fn host(&self) -> HostOs {
        self.host
    }

    /// Native targets enabled on this host, in enumeration order.
    pub fn enabled(&self) -> &'static [NativeTarget] {
        const LINUX: &[NativeTarget] = &[
            NativeTarget::LINUX_X64,
            NativeTarget::LINUX_ARM32_HFP,
            NativeTarget::LINUX_MIPS32,
            NativeTarget::LINUX_MIPSEL32,
            NativeTarget::ANDROID_ARM32,
            NativeTarget::ANDROID_ARM64,
            NativeTarget::WASM32,
        ];
        const MACOS: &[NativeTarget] = &[
            NativeTarget::MACOS_X64,
            NativeTarget::IOS_ARM32,
            NativeTarget::IOS_ARM64,
            NativeTarget::IOS_X64,
            NativeTarget::LINUX_X64,
            NativeTarget::LINUX_ARM32_HFP,
            NativeTarget::ANDROID_ARM32,
            NativeTarget::ANDROID_ARM64,
            NativeTarget::WASM32,
        ];
        const WINDOWS: &[NativeTarget] = &[
            NativeTarget::MINGW_X64,
            NativeTarget::LINUX_X64,
            NativeTarget::ANDROID_ARM32,
            NativeTarget::ANDROID_ARM64,
            NativeTarget::WASM32,
        ];

        match self.host {
            HostOs::Linux => LINUX,
            HostOs::Macos => MACOS,
            HostOs::Windows => WINDOWS,
        }
    }

    pub fn is_enabled(&self, target: &NativeTarget) -> bool {
        self.enabled().contains(target)
    }
}
