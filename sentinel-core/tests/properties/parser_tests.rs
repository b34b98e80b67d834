//! Property tests for metric parsers

use proptest::prelude::*;
use sentinel_core::monitoring::{MemoryReading, MetricsParser};

proptest! {
    /// Property: CPU usage is 100 minus the reported idle percentage
    #[test]
    fn cpu_usage_complements_idle(tenths in 0u32..=1000) {
        let idle = f64::from(tenths) / 10.0;
        let usage = MetricsParser::parse_cpu_usage(&format!("{idle:.1}\n")).unwrap();
        prop_assert!((usage - (100.0 - idle)).abs() < 1e-9);
        prop_assert!((0.0..=100.0).contains(&usage));
    }

    /// Property: non-numeric CPU output is rejected
    #[test]
    fn cpu_rejects_words(word in "[a-zA-Z:() ]{1,30}") {
        prop_assume!(!word.trim().is_empty());
        prop_assume!(word.trim().parse::<f64>().is_err());
        prop_assert!(MetricsParser::parse_cpu_usage(&word).is_err());
    }

    /// Property: well-formed memory and swap lines parse field by field
    #[test]
    fn memory_lines_parse(
        total in 0u64..10_000_000,
        used in 0u64..10_000_000,
        free in 0u64..10_000_000,
        swap_total in 0u64..1_000_000,
        swap_used in 0u64..1_000_000,
    ) {
        let output = format!(
            "              total        used        free\n\
             Mem: {total} {used} {free} 0 0 0\n\
             Swap: {swap_total} {swap_used} 0\n"
        );
        prop_assert_eq!(
            MetricsParser::parse_memory(&output),
            MemoryReading {
                total_mb: total,
                used_mb: used,
                free_mb: free,
                swap_total_mb: swap_total,
                swap_used_mb: swap_used,
            }
        );
    }

    /// Property: arbitrary text never panics the memory parser
    #[test]
    fn memory_parser_total(text in ".{0,200}") {
        let _ = MetricsParser::parse_memory(&text);
    }

    /// Property: top-process output is stored trimmed and otherwise verbatim
    #[test]
    fn top_processes_trimmed(body in "[a-z%0-9 .\n]{0,80}") {
        let padded = format!("\n  {body}  \n");
        prop_assert_eq!(MetricsParser::parse_top_processes(&padded), body.trim());
    }
}
