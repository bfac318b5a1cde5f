//! The exported metric set. Names and label schemas are a stable contract.

use super::MetricDesc;

const BGP_LABELS: &[&str] = &["target", "asn", "ip", "description"];
const TARGET: &[&str] = &["target"];

pub static BGP_UP: MetricDesc = MetricDesc {
    name: "cisco_bgp_session_up",
    help: "Session is up (1 = Established)",
    labels: BGP_LABELS,
};

pub static BGP_PREFIXES_RECEIVED: MetricDesc = MetricDesc {
    name: "cisco_bgp_session_prefixes_received_count",
    help: "Number of received prefixes",
    labels: BGP_LABELS,
};

pub static BGP_PREFIXES_ADVERTISED: MetricDesc = MetricDesc {
    name: "cisco_bgp_session_prefixes_advertised_count",
    help: "Number of advertised prefixes",
    labels: BGP_LABELS,
};

pub static BGP_BEST_PATHS: MetricDesc = MetricDesc {
    name: "cisco_bgp_session_best_path_count",
    help: "Number of best paths from peer",
    labels: BGP_LABELS,
};

pub static VERSION: MetricDesc = MetricDesc {
    name: "cisco_version",
    help: "Running OS version",
    labels: &["target", "version"],
};

pub static MEMORY_TOTAL: MetricDesc = MetricDesc {
    name: "cisco_memory_total_bytes",
    help: "Total memory in bytes",
    labels: &["target", "type"],
};

pub static MEMORY_USED: MetricDesc = MetricDesc {
    name: "cisco_memory_used_bytes",
    help: "Used memory in bytes",
    labels: &["target", "type"],
};

pub static MEMORY_FREE: MetricDesc = MetricDesc {
    name: "cisco_memory_free_bytes",
    help: "Free memory in bytes",
    labels: &["target", "type"],
};

pub static CPU_FIVE_SECONDS: MetricDesc = MetricDesc {
    name: "cisco_cpu_five_seconds_percent",
    help: "CPU utilization for five seconds",
    labels: TARGET,
};

pub static CPU_INTERRUPTS: MetricDesc = MetricDesc {
    name: "cisco_cpu_interrupt_percent",
    help: "Interrupt percentage of CPU utilization for five seconds",
    labels: TARGET,
};

pub static CPU_ONE_MINUTE: MetricDesc = MetricDesc {
    name: "cisco_cpu_one_minute_percent",
    help: "CPU utilization for one minute",
    labels: TARGET,
};

pub static CPU_FIVE_MINUTES: MetricDesc = MetricDesc {
    name: "cisco_cpu_five_minutes_percent",
    help: "CPU utilization for five minutes",
    labels: TARGET,
};

pub static CPU_FIFTEEN_MINUTES: MetricDesc = MetricDesc {
    name: "cisco_cpu_fifteen_minutes_percent",
    help: "CPU utilization for fifteen minutes",
    labels: TARGET,
};

pub static UP: MetricDesc = MetricDesc {
    name: "cisco_up",
    help: "Device poll completed without a transport error",
    labels: TARGET,
};

pub static COLLECTOR_DURATION: MetricDesc = MetricDesc {
    name: "cisco_collector_duration_seconds",
    help: "Time spent in one collector during the last poll",
    labels: &["target", "collector"],
};
