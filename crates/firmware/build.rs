use std::env;

/// Optional build-time overrides of the factory defaults
///
/// Each is exported to the crate (empty when unset), so the firmware can be
/// flashed with site-specific access point credentials and ports.
const DEFAULT_OVERRIDES: [&str; 6] = [
    "WIFI_SSID",
    "WIFI_PASSWORD",
    "WIFI_CHANNEL",
    "WIFI_UDP_HPORT",
    "WIFI_UDP_CPORT",
    "UART_BAUDRATE",
];

fn main() {
    for name in DEFAULT_OVERRIDES {
        match env::var(name) {
            Ok(value) => {
                println!("cargo:rustc-env={}={}", name, value);
                if name == "WIFI_PASSWORD" {
                    println!("cargo:warning=Using WIFI_PASSWORD from environment (hidden)");
                } else {
                    println!("cargo:warning=Using {} from environment: {}", name, value);
                }
            }
            Err(_) => println!("cargo:rustc-env={}=", name),
        }
    }

    // Rerun if environment variables change
    for name in DEFAULT_OVERRIDES {
        println!("cargo:rerun-if-env-changed={}", name);
    }
}
