#![no_main]

use libfuzzer_sys::fuzz_target;
use vizembed_core::{EmbedParameters, EmbedWidth, SizePolicy};

fuzz_target!(|data: &[u8]| {
    let Ok(attrs) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let policy = SizePolicy::default();
    let params = EmbedParameters::from_attrs(&attrs, &policy);

    // Decoding never yields a size below the minimums.
    assert!(params.height >= policy.min_height, "height below minimum");
    if let EmbedWidth::Pixels(px) = params.width {
        assert!(px >= policy.min_width, "width below minimum");
    }

    // Re-encoding and decoding again is stable.
    let again = EmbedParameters::from_attrs(&params.to_attrs(), &policy);
    assert_eq!(again, params, "decode is not idempotent");

    let url = params.view_url();
    assert!(url.contains("/views/"), "missing views segment");
    assert!(url.contains("?:embed=y&:showVizHome=no"), "missing embed flags");
    assert_eq!(url.matches(":toolbar=").count(), 1, "toolbar flag count");
});
