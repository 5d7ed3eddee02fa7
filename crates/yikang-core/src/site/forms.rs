// Public inquiry and demo-request forms.

use serde::{Deserialize, Serialize};

use crate::validate::FormErrors;

/// Products a visitor can mark interest in, in display order.
pub const INTEREST_PRODUCTS: [&str; 5] = [
    "康复全程智能化管理系统",
    "数字化远程康复系统",
    "康复医联体共同管理平台",
    "智能化病人随访系统",
    "智能化慢病管理系统",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub hospital_name: String,
    pub position: String,
    pub phone: String,
    pub email: String,
    pub message: String,
    pub interest_products: Vec<String>,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        errors.require("name", &self.name, "请输入您的姓名");
        errors.require("phone", &self.phone, "请输入联系电话");
        errors.into_result()
    }

    /// Add `product` if absent, remove it if present. Returns whether it
    /// is selected afterwards.
    pub fn toggle_interest(&mut self, product: &str) -> bool {
        if let Some(pos) = self.interest_products.iter().position(|p| p == product) {
            self.interest_products.remove(pos);
            false
        } else {
            self.interest_products.push(product.to_owned());
            true
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoRequestForm {
    pub contact_name: String,
    pub hospital_name: String,
    pub phone: String,
    pub email: String,
    pub preferred_product: String,
    pub preferred_time: String,
    pub message: String,
}

impl DemoRequestForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        errors.require("contact_name", &self.contact_name, "请输入联系人姓名");
        errors.require("phone", &self.phone, "请输入联系电话");
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes_keeping_order() {
        let mut form = ContactForm::default();
        assert!(form.toggle_interest(INTEREST_PRODUCTS[2]));
        assert!(form.toggle_interest(INTEREST_PRODUCTS[0]));
        assert_eq!(
            form.interest_products,
            vec![INTEREST_PRODUCTS[2].to_owned(), INTEREST_PRODUCTS[0].to_owned()]
        );
        assert!(!form.toggle_interest(INTEREST_PRODUCTS[2]));
        assert_eq!(form.interest_products, vec![INTEREST_PRODUCTS[0].to_owned()]);
    }

    #[test]
    fn contact_requires_name_and_phone() {
        let errors = ContactForm::default().validate().unwrap_err();
        assert_eq!(errors.get("name"), Some("请输入您的姓名"));
        assert_eq!(errors.get("phone"), Some("请输入联系电话"));

        let form = ContactForm {
            name: "李医生".into(),
            phone: "13900000000".into(),
            ..ContactForm::default()
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn demo_requires_contact_name_and_phone() {
        let form = DemoRequestForm {
            phone: "13900000000".into(),
            ..DemoRequestForm::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.errors().len(), 1);
        assert_eq!(errors.get("contact_name"), Some("请输入联系人姓名"));
    }
}
