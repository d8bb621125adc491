mod crowdfund_page;

pub use crowdfund_page::CrowdFundPage;
