use std::fmt;

use crate::config::HandlerConfig;

/// Topic the emoji pipeline listens on.
pub const HANDLE_EMOJI: &str = "handle-emoji";

/// An SNS topic ARN: `arn:aws:sns:{region}:{account}:{name}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicArn(String);

impl TopicArn {
    pub fn new(region: &str, account: &str, name: &str) -> Self {
        Self(format!("arn:aws:sns:{region}:{account}:{name}"))
    }

    pub fn handle_emoji(config: &HandlerConfig) -> Self {
        Self::new(&config.region, &config.user_id, HANDLE_EMOJI)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last ARN segment.
    pub fn name(&self) -> &str {
        self.0.rsplit(':').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for TopicArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TopicArn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_sns_arn() {
        let arn = TopicArn::new("us-east-1", "123456789012", HANDLE_EMOJI);
        assert_eq!(arn.as_str(), "arn:aws:sns:us-east-1:123456789012:handle-emoji");
        assert_eq!(arn.to_string(), arn.as_str());
    }

    #[test]
    fn name_is_last_segment() {
        let arn = TopicArn::new("eu-north-1", "000000000000", "s3-file-ready");
        assert_eq!(arn.name(), "s3-file-ready");
    }
}
