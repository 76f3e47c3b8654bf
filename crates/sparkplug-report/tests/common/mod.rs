#![allow(dead_code)]

use sparkplug_report::ReportConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const TEST_DIR: &str = "src/main/java/org/eclipse/sparkplug/tck/test";
pub const REQUIREMENTS: &str = "src/main/java/org/eclipse/sparkplug/tck/test/common/Requirements.java";

const TCK_TEST: &str = r"package org.eclipse.sparkplug.tck.test;

public abstract class TCKTest {
    private final List<String> testIds = List.of(ID_NEVER_REPORTED);
}
";

const MONITOR: &str = r"package org.eclipse.sparkplug.tck.test;

public class Monitor {
    private final @NotNull List<String> testIds = List.of(
        ID_PAYLOADS_TIMESTAMP_IN_UTC, // shared by Host and Edge
        ID_PAYLOADS_NBIRTH_SEQ);
}
";

const HOST_SESSION: &str = r"package org.eclipse.sparkplug.tck.test.host;

public class SessionEstablishmentTest extends TCKTest {
    private final @NotNull List<String> testIds = List.of(ID_NBIRTH_001, ID_HOST_TOPIC_PHID);
}
";

const EDGE_SEND_DATA: &str = r"package org.eclipse.sparkplug.tck.test.edge;

public class SendDataTest extends TCKTest {
    private final @NotNull List<String> testIds = List.of(
            ID_TOPICS_NBIRTH_MQTT,
            ID_TOPIC_RECOMMENDED,
            ID_PAYLOADS_TEMPLATE_DEFINITION);
}
";

const EDGE_SEND_NODE_DATA: &str = r#"package org.eclipse.sparkplug.tck.test.edge;

public class SendNodeDataTest extends TCKTest {
    String[] testIds = {
        	"topics-ndata-mqtt",
        	"topics-ndata-seq-num"
        };
}
"#;

const BROKER_AWARE: &str = r"package org.eclipse.sparkplug.tck.test.broker;

public class AwareBrokerTest extends TCKTest {
    private final String[] testIds = {Requirements.ID_CONFORMANCE_MQTT_AWARE_STORE, ID_CONFORMANCE_MQTT_QOS0};
}
";

pub const REQUIREMENTS_SOURCE: &str = r#"package org.eclipse.sparkplug.tck.test.common;

public class Requirements {
    public final static String ID_NBIRTH_001 = "nbirth-001";
    public final static String NBIRTH_001 = "The NBIRTH message MUST be the first message published.";

    public final static String ID_TOPICS_NBIRTH_MQTT = "topics-nbirth-mqtt";
    public final static String TOPICS_NBIRTH_MQTT = "NBIRTH messages MUST be published with "
            + "MQTT QoS equal to 0.";

    public final static String ID_TOPIC_RECOMMENDED = "topic-recommended";
    public final static String TOPIC_RECOMMENDED = "Edge Nodes SHOULD use short topic names.";

    public final static String ID_PAYLOADS_TEMPLATE_DEFINITION = "payloads-template-definition";
    public final static String PAYLOADS_TEMPLATE_DEFINITION = "A Template definition MUST be included in the NBIRTH.";

    public final static String ID_PAYLOADS_TIMESTAMP_IN_UTC = "payloads-timestamp-in-utc";
    public final static String PAYLOADS_TIMESTAMP_IN_UTC = "The timestamp MUST be in UTC.";

    public final static String ID_PAYLOADS_NBIRTH_SEQ = "payloads-nbirth-seq";
    public final static String PAYLOADS_NBIRTH_SEQ = "Every NBIRTH MUST include a sequence number.";

    public final static String ID_CONFORMANCE_MQTT_AWARE_STORE = "conformance-mqtt-aware-store";
    public final static String CONFORMANCE_MQTT_AWARE_STORE = "A Sparkplug Aware broker MAY store NBIRTH messages.";

    public final static String ID_CONFORMANCE_MQTT_QOS0 = "conformance-mqtt-qos0";
    public final static String CONFORMANCE_MQTT_QOS0 = "The broker MUST support QoS 0.";
}
"#;

/// A throwaway TCK source tree with one module per profile.
pub struct TckTree {
    pub dir: TempDir,
}

impl TckTree {
    pub fn new() -> Self {
        Self::with_requirements(REQUIREMENTS_SOURCE)
    }

    pub fn with_requirements(requirements: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, &format!("{TEST_DIR}/TCKTest.java"), TCK_TEST);
        write(root, &format!("{TEST_DIR}/Monitor.java"), MONITOR);
        write(root, &format!("{TEST_DIR}/host/SessionEstablishmentTest.java"), HOST_SESSION);
        write(root, &format!("{TEST_DIR}/edge/SendDataTest.java"), EDGE_SEND_DATA);
        write(root, &format!("{TEST_DIR}/edge/SendNodeDataTest.java"), EDGE_SEND_NODE_DATA);
        write(root, &format!("{TEST_DIR}/broker/AwareBrokerTest.java"), BROKER_AWARE);
        write(root, REQUIREMENTS, requirements);
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn output_path(&self) -> PathBuf {
        self.root().join("report/summary.html")
    }

    pub fn config(&self) -> ReportConfig {
        ReportConfig::new()
            .with_source_root(self.root())
            .with_requirements_module(self.root().join(REQUIREMENTS))
            .with_output_path(self.output_path())
    }

    pub fn write_log(&self, content: &str) -> PathBuf {
        let path = self.root().join("tck.log");
        fs::write(&path, content).unwrap();
        path
    }
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// One result block in the log format the TCK writes.
pub fn block(profile: &str, test: &str, results: &[(&str, &str)]) -> String {
    let mut out = format!("2023-01-10 09:00:00.000 Summary Test Results for {profile} {test}\n");
    for (id, result) in results {
        out.push_str(&format!("{id}: {result};\n"));
    }
    let overall = if results.iter().all(|(_, r)| r.starts_with("PASS")) {
        "PASS"
    } else {
        "FAIL"
    };
    out.push_str(&format!("OVERALL: {overall};\n"));
    out
}
