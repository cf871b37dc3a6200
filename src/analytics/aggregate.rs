//! Visit aggregation
//!
//! 对查询窗口内的访问事件做单遍分组统计，纯函数，不依赖存储层。
//! 数据量上限 10 000 条（查询侧截断），不需要增量或物化。

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use url::Url;

use crate::repository::models::Visit;

/// 分组计数器：HashMap 计数 + 首次出现顺序
///
/// 输出按 count 降序，计数相同时保持首次出现顺序（稳定排序）。
#[derive(Debug, Default)]
struct GroupCounter {
    index: HashMap<String, usize>,
    pairs: Vec<(String, u64)>,
}

impl GroupCounter {
    fn add(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.pairs[i].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.pairs.len());
                self.pairs.push((key.to_string(), 1));
            }
        }
    }

    fn into_sorted_pairs(mut self) -> Vec<(String, u64)> {
        // Vec::sort_by 是稳定排序，计数相同的 key 保持插入顺序
        self.pairs.sort_by(|a, b| b.1.cmp(&a.1));
        self.pairs
    }
}

/// 单个 Web Vitals 指标的均值累加器
#[derive(Debug, Default)]
struct MetricMean {
    sum: f64,
    count: u64,
}

impl MetricMean {
    fn add(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Web Vitals 均值，每个指标独立计算，无数据为 null
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceStats {
    pub lcp: Option<f64>,
    pub fcp: Option<f64>,
    pub cls: Option<f64>,
    pub ttfb: Option<f64>,
    /// 至少上报了一个指标的事件数
    pub count: u64,
}

/// 聚合统计结果
///
/// 字段名即线上仪表盘的 JSON 契约，与前端保持一致。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitStats {
    #[serde(rename = "totalVisites")]
    pub total_visites: u64,
    #[serde(rename = "sessionsUniques")]
    pub sessions_uniques: u64,
    /// duration > 0 的事件的平均停留秒数，四舍五入；无数据为 0
    #[serde(rename = "dureeMoyenne")]
    pub duree_moyenne: u64,
    #[serde(rename = "parJour")]
    pub par_jour: BTreeMap<String, u64>,
    #[serde(rename = "parPage")]
    pub par_page: Vec<(String, u64)>,
    #[serde(rename = "parBrowser")]
    pub par_browser: Vec<(String, u64)>,
    #[serde(rename = "parDevice")]
    pub par_device: Vec<(String, u64)>,
    #[serde(rename = "parOS")]
    pub par_os: Vec<(String, u64)>,
    #[serde(rename = "parReferrer")]
    pub par_referrer: Vec<(String, u64)>,
    pub performance: PerformanceStats,
    /// 查询窗口天数
    pub jours: u32,
}

/// 从 referrer URL 提取主机名；空或无法解析归入 "Direct"
fn referrer_bucket(referrer: &str) -> String {
    if referrer.is_empty() {
        return "Direct".to_string();
    }
    Url::parse(referrer)
        .ok()
        .and_then(|u| u.host_str().map(String::from))
        .unwrap_or_else(|| "Direct".to_string())
}

/// 对事件集合做单遍聚合
pub fn aggregate(visits: &[Visit], jours: u32) -> VisitStats {
    let mut sessions: HashSet<&str> = HashSet::new();
    let mut duration_sum: u64 = 0;
    let mut duration_count: u64 = 0;

    let mut par_jour: BTreeMap<String, u64> = BTreeMap::new();
    let mut par_page = GroupCounter::default();
    let mut par_browser = GroupCounter::default();
    let mut par_device = GroupCounter::default();
    let mut par_os = GroupCounter::default();
    let mut par_referrer = GroupCounter::default();

    let mut lcp = MetricMean::default();
    let mut fcp = MetricMean::default();
    let mut cls = MetricMean::default();
    let mut ttfb = MetricMean::default();
    let mut perf_count: u64 = 0;

    for visit in visits {
        if !visit.session_id.is_empty() {
            sessions.insert(visit.session_id.as_str());
        }

        if visit.duration > 0 {
            duration_sum += visit.duration as u64;
            duration_count += 1;
        }

        *par_jour
            .entry(visit.created_at.format("%Y-%m-%d").to_string())
            .or_insert(0) += 1;

        par_page.add(&visit.page);
        par_browser.add(if visit.browser.is_empty() {
            "Inconnu"
        } else {
            &visit.browser
        });
        par_device.add(if visit.device.is_empty() {
            "unknown"
        } else {
            &visit.device
        });
        par_os.add(if visit.os.is_empty() {
            "Inconnu"
        } else {
            &visit.os
        });
        par_referrer.add(&referrer_bucket(&visit.referrer));

        lcp.add(visit.lcp);
        fcp.add(visit.fcp);
        cls.add(visit.cls);
        ttfb.add(visit.ttfb);
        if visit.lcp.is_some() || visit.fcp.is_some() || visit.cls.is_some() || visit.ttfb.is_some()
        {
            perf_count += 1;
        }
    }

    let duree_moyenne = if duration_count > 0 {
        (duration_sum as f64 / duration_count as f64).round() as u64
    } else {
        0
    };

    VisitStats {
        total_visites: visits.len() as u64,
        sessions_uniques: sessions.len() as u64,
        duree_moyenne,
        par_jour,
        par_page: par_page.into_sorted_pairs(),
        par_browser: par_browser.into_sorted_pairs(),
        par_device: par_device.into_sorted_pairs(),
        par_os: par_os.into_sorted_pairs(),
        par_referrer: par_referrer.into_sorted_pairs(),
        performance: PerformanceStats {
            lcp: lcp.mean(),
            fcp: fcp.mean(),
            cls: cls.mean(),
            ttfb: ttfb.mean(),
            count: perf_count,
        },
        jours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn visit(page: &str) -> Visit {
        Visit {
            id: 0,
            page: page.to_string(),
            referrer: String::new(),
            user_agent: String::new(),
            language: String::new(),
            screen_width: None,
            screen_height: None,
            device: "desktop".to_string(),
            browser: "Chrome".to_string(),
            os: "Windows".to_string(),
            session_id: String::new(),
            duration: 0,
            lcp: None,
            fcp: None,
            cls: None,
            ttfb: None,
            created_at: Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_empty_set() {
        let stats = aggregate(&[], 30);
        assert_eq!(stats.total_visites, 0);
        assert_eq!(stats.sessions_uniques, 0);
        assert_eq!(stats.duree_moyenne, 0);
        assert!(stats.par_jour.is_empty());
        assert!(stats.par_page.is_empty());
        assert!(stats.par_referrer.is_empty());
        assert_eq!(stats.performance.lcp, None);
        assert_eq!(stats.performance.fcp, None);
        assert_eq!(stats.performance.cls, None);
        assert_eq!(stats.performance.ttfb, None);
        assert_eq!(stats.performance.count, 0);
        assert_eq!(stats.jours, 30);
    }

    #[test]
    fn test_grouped_counts_sorted_descending() {
        // A:3, B:5, C:1 → [B,5],[A,3],[C,1]
        let mut visits = Vec::new();
        for _ in 0..3 {
            visits.push(visit("/a"));
        }
        for _ in 0..5 {
            visits.push(visit("/b"));
        }
        visits.push(visit("/c"));

        let stats = aggregate(&visits, 30);
        assert_eq!(
            stats.par_page,
            vec![
                ("/b".to_string(), 5),
                ("/a".to_string(), 3),
                ("/c".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let visits = vec![visit("/x"), visit("/y"), visit("/y"), visit("/x")];
        let stats = aggregate(&visits, 30);
        assert_eq!(
            stats.par_page,
            vec![("/x".to_string(), 2), ("/y".to_string(), 2)]
        );
    }

    #[test]
    fn test_unique_sessions_ignore_empty() {
        let mut visits = vec![visit("/"), visit("/"), visit("/"), visit("/")];
        visits[0].session_id = "a".to_string();
        visits[1].session_id = "a".to_string();
        visits[2].session_id = "b".to_string();
        visits[3].session_id = String::new();

        let stats = aggregate(&visits, 30);
        assert_eq!(stats.sessions_uniques, 2);
    }

    #[test]
    fn test_mean_duration_rounds_and_ignores_zero() {
        let mut visits = vec![visit("/"), visit("/"), visit("/")];
        visits[0].duration = 10;
        visits[1].duration = 15;
        visits[2].duration = 0; // page-view 事件不计入

        let stats = aggregate(&visits, 30);
        // (10 + 15) / 2 = 12.5 → 13
        assert_eq!(stats.duree_moyenne, 13);
    }

    #[test]
    fn test_web_vitals_independent_means() {
        let mut visits = vec![visit("/"), visit("/")];
        visits[0].lcp = Some(100.0);
        visits[1].lcp = Some(200.0);
        visits[1].fcp = Some(50.0);

        let stats = aggregate(&visits, 30);
        assert_eq!(stats.performance.lcp, Some(150.0));
        assert_eq!(stats.performance.fcp, Some(50.0));
        assert_eq!(stats.performance.cls, None);
        assert_eq!(stats.performance.count, 2);
    }

    #[test]
    fn test_referrer_buckets() {
        let mut visits = vec![visit("/"), visit("/"), visit("/")];
        visits[0].referrer = "https://google.com/search".to_string();
        visits[1].referrer = "not a url".to_string();
        visits[2].referrer = String::new();

        let stats = aggregate(&visits, 30);
        assert_eq!(
            stats.par_referrer,
            vec![("Direct".to_string(), 2), ("google.com".to_string(), 1)]
        );
    }

    #[test]
    fn test_referrer_bucket_never_errors() {
        for bad in ["not a url", "://", "https://", "%%%", "javascript:alert(1)"] {
            let bucket = referrer_bucket(bad);
            assert!(!bucket.is_empty());
        }
    }

    #[test]
    fn test_par_jour_truncates_to_date() {
        let mut visits = vec![visit("/"), visit("/"), visit("/")];
        visits[0].created_at = Utc.with_ymd_and_hms(2026, 3, 15, 8, 0, 0).unwrap();
        visits[1].created_at = Utc.with_ymd_and_hms(2026, 3, 15, 23, 59, 59).unwrap();
        visits[2].created_at = Utc.with_ymd_and_hms(2026, 3, 16, 0, 0, 1).unwrap();

        let stats = aggregate(&visits, 7);
        assert_eq!(stats.par_jour.get("2026-03-15"), Some(&2));
        assert_eq!(stats.par_jour.get("2026-03-16"), Some(&1));
    }

    #[test]
    fn test_missing_labels_get_default_buckets() {
        let mut v = visit("/");
        v.browser = String::new();
        v.device = String::new();
        v.os = String::new();

        let stats = aggregate(&[v], 30);
        assert_eq!(stats.par_browser, vec![("Inconnu".to_string(), 1)]);
        assert_eq!(stats.par_device, vec![("unknown".to_string(), 1)]);
        assert_eq!(stats.par_os, vec![("Inconnu".to_string(), 1)]);
    }

    #[test]
    fn test_stats_serialize_to_wire_names() {
        let stats = aggregate(&[visit("/accueil")], 30);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalVisites"], 1);
        assert_eq!(json["jours"], 30);
        assert!(json["parPage"].is_array());
        assert!(json["performance"]["lcp"].is_null());
        // (key, count) 对序列化为二元数组
        assert_eq!(json["parPage"][0][0], "/accueil");
        assert_eq!(json["parPage"][0][1], 1);
    }
}
