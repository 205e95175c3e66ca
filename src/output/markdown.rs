//! Markdown report generation
//!
//! Renders a `CheckResult` as a human-readable report: status, SEO
//! breakdown and each domain section that was collected.

use crate::engine::CheckResult;
use crate::inspect::{ArchiveAge, ArchiveStatus, CertificateInfo, DnsSnapshot};
use crate::registration::RegistrationRecord;
use crate::seo::SeoReport;

/// Formats a check result as markdown
pub fn format_markdown_report(result: &CheckResult) -> String {
    let mut md = String::new();

    md.push_str("# Sumi-Scope Site Report\n\n");

    md.push_str("## Overview\n\n");
    md.push_str(&format!("- **URL**: {}\n", result.url));
    md.push_str(&format!("- **Status**: {}\n", result.status));
    md.push_str(&format!("- **Duration**: {}\n\n", result.duration));

    if let Some(seo) = &result.seo {
        push_seo(&mut md, seo);
    }

    let info = &result.domain_info;
    if let Some(record) = &info.registration {
        push_registration(&mut md, record);
    }
    if let Some(certificate) = &info.certificate {
        push_certificate(&mut md, certificate);
    }
    if let Some(dns) = &info.dns {
        push_dns(&mut md, dns);
    }
    if let Some(age) = &info.archive {
        push_archive(&mut md, age);
    }

    md
}

fn push_seo(md: &mut String, seo: &SeoReport) {
    md.push_str("## SEO\n\n");
    md.push_str(&format!(
        "- **Score**: {}/100 (grade {})\n",
        seo.score, seo.grade
    ));
    md.push_str(&format!("- **Title**: {}\n", or_none(&seo.title)));
    md.push_str(&format!(
        "- **Description**: {}\n",
        or_none(&seo.description)
    ));
    md.push_str(&format!("- **Keywords**: {}\n", or_none(&seo.keywords)));
    md.push_str(&format!("- **Canonical**: {}\n", or_none(&seo.canonical)));
    md.push_str(&format!("- **Robots**: {}\n", or_none(&seo.robots)));
    md.push_str(&format!(
        "- **Images**: {} total, {} without alt\n\n",
        seo.total_images, seo.images_without_alt
    ));

    if !seo.h1_tags.is_empty() {
        md.push_str("### H1 Headings\n\n");
        for h1 in &seo.h1_tags {
            md.push_str(&format!("- {}\n", h1));
        }
        md.push('\n');
    }

    md.push_str("### Social Metadata\n\n");
    md.push_str("| Tag | Value |\n");
    md.push_str("|-----|-------|\n");
    let social = [
        ("og:title", &seo.open_graph.title),
        ("og:description", &seo.open_graph.description),
        ("og:image", &seo.open_graph.image),
        ("og:url", &seo.open_graph.url),
        ("twitter:card", &seo.twitter.card_type),
        ("twitter:title", &seo.twitter.title),
        ("twitter:description", &seo.twitter.description),
        ("twitter:image", &seo.twitter.image),
    ];
    for (tag, value) in social {
        md.push_str(&format!("| {} | {} |\n", tag, or_none(value)));
    }
    md.push('\n');
}

fn push_registration(md: &mut String, record: &RegistrationRecord) {
    md.push_str("## Registration\n\n");
    md.push_str(&format!("- **Domain**: {}\n", record.domain));
    md.push_str(&format!("- **Registrar**: {}\n", record.registrar));
    md.push_str(&format!("- **Registered**: {}\n", record.registered_on));
    md.push_str(&format!("- **Expires**: {}\n", record.expires_on));
    md.push_str(&format!("- **Updated**: {}\n\n", record.updated_on));
}

fn push_certificate(md: &mut String, certificate: &CertificateInfo) {
    md.push_str("## TLS Certificate\n\n");
    if !certificate.has_ssl {
        md.push_str("No certificate could be retrieved.\n\n");
        return;
    }
    md.push_str(&format!("- **Issuer**: {}\n", certificate.issuer));
    md.push_str(&format!("- **Issued To**: {}\n", certificate.issued_to));
    md.push_str(&format!("- **Valid From**: {}\n", certificate.valid_from));
    md.push_str(&format!("- **Valid Until**: {}\n", certificate.valid_until));
    if let Some(days) = certificate.days_until_expiry {
        md.push_str(&format!("- **Days Until Expiry**: {}\n", days));
    }
    md.push_str(&format!(
        "- **Valid Now**: {}\n\n",
        if certificate.is_valid { "yes" } else { "no" }
    ));
}

fn push_dns(md: &mut String, dns: &DnsSnapshot) {
    md.push_str("## DNS\n\n");
    md.push_str("| Record | Values |\n");
    md.push_str("|--------|--------|\n");
    md.push_str(&format!("| A | {} |\n", join_or_none(&dns.ip_addresses)));
    md.push_str(&format!("| MX | {} |\n", join_or_none(&dns.mail_servers)));
    md.push_str(&format!("| NS | {} |\n\n", join_or_none(&dns.nameservers)));
}

fn push_archive(md: &mut String, age: &ArchiveAge) {
    md.push_str("## Domain Age\n\n");
    match (age.status, &age.first_seen, age.age_days, age.age_years) {
        (ArchiveStatus::Found, Some(first_seen), Some(days), Some(years)) => {
            md.push_str(&format!("- **First Archived**: {}\n", first_seen));
            md.push_str(&format!(
                "- **Age**: {} days ({:.1} years)\n\n",
                days, years
            ));
        }
        _ => md.push_str("No archived capture found.\n\n"),
    }
}

fn or_none(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("(none)")
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "(none)".to_string()
    } else {
        values.join(", ")
    }
}
