//! User-Agent classification
//!
//! 规则按声明顺序匹配，首个命中生效。顺序就是契约：
//! Android UA 自带 "Linux"，按顺序会先落到 Linux；iPhone UA 自带
//! "like Mac OS X"，会先落到 macOS。统计维度要的是稳定可复现，
//! 不是精确的设备指纹。

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    Mobile,
    Tablet,
    Desktop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Browser {
    Chrome,
    Firefox,
    Safari,
    Edge,
    Opera,
    Ie,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Windows,
    MacOs,
    Linux,
    Android,
    Ios,
    Other,
}

impl Device {
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Mobile => "mobile",
            Device::Tablet => "tablet",
            Device::Desktop => "desktop",
        }
    }
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chrome => "Chrome",
            Browser::Firefox => "Firefox",
            Browser::Safari => "Safari",
            Browser::Edge => "Edge",
            Browser::Opera => "Opera",
            Browser::Ie => "IE",
            Browser::Other => "Other",
        }
    }
}

impl Os {
    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Windows => "Windows",
            Os::MacOs => "macOS",
            Os::Linux => "Linux",
            Os::Android => "Android",
            Os::Ios => "iOS",
            Os::Other => "Other",
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn contains_any(ua: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| ua.contains(n))
}

/// 设备识别：tablet → mobile → 泛 Android 平板 → desktop
pub fn detect_device(user_agent: &str) -> Device {
    let ua = user_agent.to_lowercase();
    if contains_any(&ua, &["tablet", "ipad"]) {
        Device::Tablet
    } else if contains_any(&ua, &["mobile", "iphone"]) {
        Device::Mobile
    } else if ua.contains("android") {
        // Android 无 "Mobile" 标记的按平板计
        Device::Tablet
    } else {
        Device::Desktop
    }
}

/// 浏览器识别，按 Edge → Opera → Firefox → Chrome → Safari → IE 顺序
pub fn detect_browser(user_agent: &str) -> Browser {
    let ua = user_agent.to_lowercase();
    if ua.contains("edg/") {
        Browser::Edge
    } else if contains_any(&ua, &["opr/", "opera"]) {
        Browser::Opera
    } else if ua.contains("firefox") {
        Browser::Firefox
    } else if ua.contains("chrome") {
        Browser::Chrome
    } else if ua.contains("safari") {
        Browser::Safari
    } else if contains_any(&ua, &["msie", "trident"]) {
        Browser::Ie
    } else {
        Browser::Other
    }
}

/// 操作系统识别，按 Windows → macOS → Linux → Android → iOS 顺序
pub fn detect_os(user_agent: &str) -> Os {
    let ua = user_agent.to_lowercase();
    if ua.contains("windows") {
        Os::Windows
    } else if contains_any(&ua, &["macintosh", "mac os"]) {
        Os::MacOs
    } else if ua.contains("linux") {
        Os::Linux
    } else if ua.contains("android") {
        Os::Android
    } else if contains_any(&ua, &["iphone", "ipad", "ipod"]) {
        Os::Ios
    } else {
        Os::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
        (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const EDGE_WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
        (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0";
    const SAFARI_MAC: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
        AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15";
    const SAFARI_IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X) \
        AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.6 Mobile/15E148 Safari/604.1";
    const FIREFOX_ANDROID: &str =
        "Mozilla/5.0 (Android 13; Mobile; rv:120.0) Gecko/120.0 Firefox/120.0";
    const CHROME_ANDROID_TV: &str = "Mozilla/5.0 (Linux; Android 9; BRAVIA 4K GB) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/80.0.3987.93 Safari/537.36";
    const OPERA_LINUX: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
        (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36 OPR/105.0.0.0";
    const IE11_WINDOWS: &str = "Mozilla/5.0 (Windows NT 6.1; WOW64; Trident/7.0; rv:11.0) like Gecko";

    // 表驱动：与服务端落库字段一一对应
    #[test]
    fn test_classification_table() {
        let cases: &[(&str, Device, Browser, Os)] = &[
            (CHROME_WINDOWS, Device::Desktop, Browser::Chrome, Os::Windows),
            (EDGE_WINDOWS, Device::Desktop, Browser::Edge, Os::Windows),
            (SAFARI_MAC, Device::Desktop, Browser::Safari, Os::MacOs),
            (SAFARI_IPAD, Device::Tablet, Browser::Safari, Os::MacOs),
            (FIREFOX_ANDROID, Device::Mobile, Browser::Firefox, Os::Android),
            (CHROME_ANDROID_TV, Device::Tablet, Browser::Chrome, Os::Linux),
            (OPERA_LINUX, Device::Desktop, Browser::Opera, Os::Linux),
            (IE11_WINDOWS, Device::Desktop, Browser::Ie, Os::Windows),
        ];

        for (ua, device, browser, os) in cases {
            assert_eq!(detect_device(ua), *device, "device for {}", ua);
            assert_eq!(detect_browser(ua), *browser, "browser for {}", ua);
            assert_eq!(detect_os(ua), *os, "os for {}", ua);
        }
    }

    #[test]
    fn test_edge_matches_before_chrome() {
        // Edge UA 同时包含 Chrome 和 Safari，顺序决定归类
        assert_eq!(detect_browser(EDGE_WINDOWS), Browser::Edge);
    }

    #[test]
    fn test_iphone_is_mobile() {
        let ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
            AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
        assert_eq!(detect_device(ua), Device::Mobile);
        // "like Mac OS X" 先于 iphone 命中
        assert_eq!(detect_os(ua), Os::MacOs);
    }

    #[test]
    fn test_empty_and_unknown_ua() {
        assert_eq!(detect_device(""), Device::Desktop);
        assert_eq!(detect_browser(""), Browser::Other);
        assert_eq!(detect_os(""), Os::Other);

        assert_eq!(detect_browser("curl/8.4.0"), Browser::Other);
        assert_eq!(detect_os("curl/8.4.0"), Os::Other);
    }

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(Device::Mobile.as_str(), "mobile");
        assert_eq!(Browser::Ie.as_str(), "IE");
        assert_eq!(Os::MacOs.as_str(), "macOS");
        assert_eq!(Os::Ios.as_str(), "iOS");
    }
}
